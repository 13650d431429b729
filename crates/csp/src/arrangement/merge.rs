//! Fold nodes that describe the same crossing back into one.
//!
//! Two distinct nodes sharing two lines contradict the geometry (two lines
//! meet once), so one of them absorbs the other. Absorptions leave a trail of
//! bounding rectangles; nodes caught inside a combined rectangle are folded
//! into one representative as well. Rounds repeat until no pair shares two
//! lines. Every round that merges removes at least one node, so this ends.

use std::collections::{BTreeSet, VecDeque};

use crate::geom2::{Line, Point};

use super::NodeMap;

/// One absorption: `absorbed` was folded into `kept`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MergeRecord {
    absorbed: Point,
    kept: Point,
}

/// Closed axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Rect {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl Rect {
    fn spanning(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            x1: a.x.max(b.x),
            y0: a.y.min(b.y),
            y1: a.y.max(b.y),
        }
    }

    fn contains(&self, p: Point) -> bool {
        (self.x0..=self.x1).contains(&p.x) && (self.y0..=self.y1).contains(&p.y)
    }

    /// `next` starts before `self` ends and one of its y bounds falls in `self`.
    fn overlaps_next(&self, next: &Rect) -> bool {
        let ys = self.y0..=self.y1;
        next.x0 <= self.x1 && (ys.contains(&next.y0) || ys.contains(&next.y1))
    }

    fn union(&self, other: &Rect) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            x1: self.x1.max(other.x1),
            y0: self.y0.min(other.y0),
            y1: self.y1.max(other.y1),
        }
    }
}

fn touches_boundary(lines: &BTreeSet<Line>) -> bool {
    lines.iter().any(Line::is_boundary)
}

fn cost_line_count(lines: &BTreeSet<Line>) -> usize {
    lines.iter().filter(|l| !l.is_boundary()).count()
}

/// Merge nodes until no two share two lines. Pure: the input is not touched.
pub fn merge_nodes(nodes: &NodeMap) -> NodeMap {
    let mut current: NodeMap = nodes
        .iter()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(p, lines)| (*p, lines.clone()))
        .collect();
    loop {
        let (merged, records) = merge_geometrically(current);
        if records.is_empty() {
            return merged;
        }
        let rects = records
            .iter()
            .map(|r| Rect::spanning(r.absorbed, r.kept))
            .collect();
        let areas = combine_rects(rects);
        current = reconcile(merged, &records, &areas);
    }
}

/// First pair in point order sharing at least two lines.
fn first_mergeable_pair(nodes: &NodeMap) -> Option<(Point, Point)> {
    let entries: Vec<_> = nodes.iter().collect();
    for (i, (p1, l1)) in entries.iter().enumerate() {
        for (p2, l2) in &entries[i + 1..] {
            if l1.intersection(l2).nth(1).is_some() {
                return Some((**p1, **p2));
            }
        }
    }
    None
}

/// Repeatedly merge the first pair sharing two lines.
///
/// The second node of the pair survives if it lies on a triangle side while
/// the first does not, or if it carries more lines.
fn merge_geometrically(mut nodes: NodeMap) -> (NodeMap, Vec<MergeRecord>) {
    let mut records = Vec::new();
    while let Some((n1, n2)) = first_mergeable_pair(&nodes) {
        let l1 = nodes.remove(&n1).unwrap_or_default();
        let l2 = nodes.remove(&n2).unwrap_or_default();
        let keep_second =
            (touches_boundary(&l2) && !touches_boundary(&l1)) || l1.len() < l2.len();
        let record = if keep_second {
            MergeRecord {
                absorbed: n1,
                kept: n2,
            }
        } else {
            MergeRecord {
                absorbed: n2,
                kept: n1,
            }
        };
        nodes.insert(record.kept, l1.union(&l2).copied().collect());
        records.push(record);
    }
    (nodes, records)
}

/// Sweep rectangles by left edge and combine each with its successor while
/// they overlap.
fn combine_rects(mut rects: Vec<Rect>) -> Vec<Rect> {
    rects.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    let mut queue: VecDeque<Rect> = rects.into();
    let mut areas = Vec::new();
    while let Some(first) = queue.pop_front() {
        match queue.front() {
            Some(next) if first.overlaps_next(next) => {
                let combined = first.union(next);
                queue.pop_front();
                queue.push_front(combined);
            }
            _ => areas.push(first),
        }
    }
    areas
}

/// Elect one representative per area among the surviving merge targets and
/// fold every node inside the area into it.
fn reconcile(mut nodes: NodeMap, records: &[MergeRecord], areas: &[Rect]) -> NodeMap {
    let absorbed: BTreeSet<Point> = records.iter().map(|r| r.absorbed).collect();
    let targets: BTreeSet<Point> = records
        .iter()
        .map(|r| r.kept)
        .filter(|p| !absorbed.contains(p))
        .collect();

    let mut representatives: Vec<Option<Point>> = Vec::with_capacity(areas.len());
    for area in areas {
        let mut winner: Option<Point> = None;
        for &challenger in targets.iter().filter(|p| area.contains(**p)) {
            if !nodes.contains_key(&challenger) {
                continue;
            }
            let Some(current) = winner else {
                winner = Some(challenger);
                continue;
            };
            let (wl, cl) = (&nodes[&current], &nodes[&challenger]);
            let challenger_wins =
                cost_line_count(wl) < cost_line_count(cl) || wl.len() < cl.len();
            let (keep, drop) = if challenger_wins {
                (challenger, current)
            } else {
                (current, challenger)
            };
            let lost = nodes.remove(&drop).unwrap_or_default();
            nodes.entry(keep).or_default().extend(lost);
            winner = Some(keep);
        }
        representatives.push(winner);
    }

    let points: Vec<Point> = nodes.keys().copied().collect();
    for p in points {
        let home = areas
            .iter()
            .zip(&representatives)
            .find_map(|(area, rep)| match rep {
                Some(rep) if area.contains(p) && nodes.contains_key(rep) => Some(*rep),
                _ => None,
            });
        if let Some(rep) = home.filter(|rep| *rep != p) {
            let lines = nodes.remove(&p).unwrap_or_default();
            nodes.entry(rep).or_default().extend(lines);
        }
    }
    nodes.retain(|_, lines| !lines.is_empty());
    nodes
}
