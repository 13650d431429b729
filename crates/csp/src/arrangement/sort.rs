//! Order each line's nodes along the line.

use crate::geom2::{Line, Point};
use crate::{CspError, Result};

use super::{LineMap, NodeMap};

/// Invert a node map: every line with the nodes on it, in point order.
pub fn line_nodes(nodes: &NodeMap) -> LineMap {
    let mut lines = LineMap::new();
    for (&p, node_lines) in nodes {
        for &line in node_lines {
            lines.entry(line).or_default().push(p);
        }
    }
    lines
}

/// The node a line is measured from.
///
/// The y axis starts at its lowest node. Other lines start at their leftmost
/// node when exactly one node sits on the y axis or none sits on the x axis,
/// and at their lowest node when exactly one sits on the x axis or none on
/// the y axis.
fn line_origin(line: Line, nodes: &[Point]) -> Option<Point> {
    let lowest = || nodes.iter().copied().min_by(|a, b| a.y.total_cmp(&b.y));
    if line == Line::YAxis {
        return lowest();
    }
    let on_y_axis = nodes.iter().filter(|p| p.x == 0.0).count();
    let on_x_axis = nodes.iter().filter(|p| p.y == 0.0).count();
    if on_y_axis == 1 || on_x_axis == 0 {
        nodes.iter().copied().min_by(|a, b| a.x.total_cmp(&b.x))
    } else if on_x_axis == 1 || on_y_axis == 0 {
        lowest()
    } else {
        None
    }
}

/// Sort every line's nodes by distance from the line's origin node.
pub fn sort_line_nodes(mut lines: LineMap) -> Result<LineMap> {
    for (line, nodes) in lines.iter_mut() {
        let origin = line_origin(*line, nodes).ok_or_else(|| CspError::UnsortableLine {
            line: *line,
            nodes: nodes.clone(),
        })?;
        nodes.sort_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)));
    }
    Ok(lines)
}
