//! Split accidental multi-line coincidences at fine precision.

use std::collections::{BTreeSet, HashMap};

use crate::geom2::{Line, Point, Precision};

use super::build::line_intersection;
use super::NodeMap;

/// Coincidences that are real rather than rounding artifacts: lines through
/// the origin, and lines sharing one y-axis intercept.
fn is_true_coincidence(node: Point, lines: &BTreeSet<Line>) -> bool {
    let mut intercepts = lines.iter().filter_map(Line::params).map(|(_, b)| b);
    if node == Point::ORIGIN && intercepts.clone().all(|b| b == 0.0) {
        return true;
    }
    if lines.contains(&Line::YAxis) {
        if let Some(first) = intercepts.next() {
            return intercepts.all(|b| b == first);
        }
    }
    false
}

/// Replace every node with more than two lines by the pairwise intersections
/// of its lines, recomputed at `Precision::FINE`.
///
/// A 2-line node that was recorded for one of the split pairs is dropped, its
/// fine-precision point takes over. Nodes to split are read from a snapshot
/// taken before any change.
pub fn unmerge_nodes(mut nodes: NodeMap) -> NodeMap {
    let pair_nodes: HashMap<(Line, Line), Point> = nodes
        .iter()
        .filter_map(|(&p, lines)| {
            let mut it = lines.iter().copied();
            match (it.next(), it.next(), it.next()) {
                (Some(a), Some(b), None) => Some(((a, b), p)),
                _ => None,
            }
        })
        .collect();
    let crowded: Vec<(Point, BTreeSet<Line>)> = nodes
        .iter()
        .filter(|(_, lines)| lines.len() > 2)
        .map(|(p, lines)| (*p, lines.clone()))
        .collect();

    for (node, lines) in crowded {
        if is_true_coincidence(node, &lines) {
            continue;
        }
        nodes.remove(&node);
        let lines: Vec<Line> = lines.into_iter().collect();
        for (i, &a) in lines.iter().enumerate() {
            for &b in &lines[i + 1..] {
                if let Some(stale) = pair_nodes.get(&(a, b)) {
                    nodes.remove(stale);
                }
                if let Some(p) = line_intersection(a, b, Precision::FINE) {
                    nodes.entry(p).or_default().extend([a, b]);
                }
            }
        }
    }
    nodes
}
