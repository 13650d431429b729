//! Candidate lines and their raw intersection nodes.

use crate::cost::{line_parameters, Predictor};
use crate::geom2::{Line, Point, Precision};

use super::NodeMap;

/// Pairwise equal-cost lines, rounded, in declared predictor order.
///
/// Lines that coincide with the x axis or the hypotenuse are skipped, and a
/// line produced by several pairs is kept once at its first occurrence.
pub fn candidate_lines(rho: f64, predictors: &[Predictor], precision: Precision) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for (i, p1) in predictors.iter().enumerate() {
        for p2 in &predictors[i + 1..] {
            let Some((slope, intercept)) = line_parameters(rho, p1, p2) else {
                continue;
            };
            let line = Line::cost(slope, intercept, precision);
            if line.duplicates_boundary() || lines.contains(&line) {
                continue;
            }
            lines.push(line);
        }
    }
    lines
}

/// The three triangle corners with their boundary lines.
pub fn corner_nodes() -> NodeMap {
    let mut nodes = NodeMap::new();
    nodes.insert(Point::ORIGIN, [Line::XAxis, Line::YAxis].into());
    nodes.insert(Point::TOP, [Line::YAxis, Line::Hypotenuse].into());
    nodes.insert(Point::RIGHT, [Line::Hypotenuse, Line::XAxis].into());
    nodes
}

/// `(x, y)` with `y = m1 x + b1` and `y = m2 x + b2`, or `None` if parallel.
fn solve(m1: f64, b1: f64, m2: f64, b2: f64) -> Option<(f64, f64)> {
    let det = m1 - m2;
    if det == 0.0 {
        return None;
    }
    Some(((b2 - b1) / det, (m1 * b2 - m2 * b1) / det))
}

/// Where two lines meet inside the triangle, rounded to `precision`.
///
/// - two boundary lines meet at their shared corner;
/// - a cost line meets the y axis at its intercept;
/// - a cost line meets the x axis at `-intercept / slope` (not if horizontal);
/// - on the hypotenuse the rounded point may miss `x + y = 1` by
///   `precision.margin()`;
/// - two cost lines must meet within the closed triangle.
pub fn line_intersection(a: Line, b: Line, precision: Precision) -> Option<Point> {
    let (cost, other) = match (a.params(), b.params()) {
        (None, None) => return corner_of(a, b),
        (Some(p), _) => (p, b),
        (None, Some(p)) => (p, a),
    };
    let (slope, intercept) = cost;
    match other {
        Line::YAxis => (0.0..=1.0)
            .contains(&intercept)
            .then(|| Point::new(0.0, intercept)),
        Line::XAxis => {
            if slope == 0.0 {
                return None;
            }
            let x = precision.round(-intercept / slope);
            (0.0..=1.0).contains(&x).then(|| Point::new(x, 0.0))
        }
        Line::Hypotenuse => {
            let (x, y) = solve(slope, intercept, -1.0, 1.0)?;
            let p = Point::rounded(x, y, precision);
            (p.in_unit_square() && (p.x + p.y - 1.0).abs() <= precision.margin()).then_some(p)
        }
        Line::Cost {
            slope: s2,
            intercept: b2,
        } => {
            let (x, y) = solve(slope, intercept, s2, b2)?;
            let p = Point::rounded(x, y, precision);
            (p.in_unit_square() && p.x + p.y <= 1.0).then_some(p)
        }
    }
}

fn corner_of(a: Line, b: Line) -> Option<Point> {
    match (a.min(b), a.max(b)) {
        (Line::XAxis, Line::YAxis) => Some(Point::ORIGIN),
        (Line::Hypotenuse, Line::YAxis) => Some(Point::TOP),
        (Line::Hypotenuse, Line::XAxis) => Some(Point::RIGHT),
        _ => None,
    }
}

/// Corners plus every intersection of a candidate line with the triangle
/// sides and with the other candidate lines.
pub fn intersection_nodes(lines: &[Line], precision: Precision) -> NodeMap {
    let mut nodes = corner_nodes();
    for &line in lines {
        let others = [Line::YAxis, Line::XAxis, Line::Hypotenuse]
            .into_iter()
            .chain(lines.iter().copied().filter(|l| *l != line));
        for other in others {
            if let Some(p) = line_intersection(line, other, precision) {
                nodes.entry(p).or_default().extend([line, other]);
            }
        }
    }
    nodes
}
