//! Arrangement of candidate lines inside the cost triangle.
//!
//! Purpose
//! - Intersect every pairwise equal-cost line with the triangle sides and
//!   with every other candidate line, keyed by the rounded intersection point.
//! - Resolve rounding artifacts: split accidental 3+-line coincidences at a
//!   finer precision (`unmerge`), then fold near-duplicate nodes that describe
//!   the same crossing back together (`merge`).
//! - Order each line's nodes along the line (`sort`) for the edge builder.
//!
//! Why this design
//! - Nodes live in an ordered map so that every pass iterates in point order
//!   and the whole build is deterministic for a given input and precision.
//! - Each pass takes a map and returns a new one; nothing is mutated while it
//!   is being iterated.
//!
//! Code cross-refs: `geom2::{Point, Line, Precision}`, `faces::InteractionGraph`.

mod build;
mod merge;
mod sort;
mod unmerge;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::cost::Predictor;
use crate::geom2::{Line, Point, Precision};
use crate::Result;

pub use build::{candidate_lines, corner_nodes, intersection_nodes, line_intersection};
pub use merge::merge_nodes;
pub use sort::{line_nodes, sort_line_nodes};
pub use unmerge::unmerge_nodes;

/// Node position -> lines through it.
pub type NodeMap = BTreeMap<Point, BTreeSet<Line>>;

/// Line -> nodes on it (ordered along the line once sorted).
pub type LineMap = BTreeMap<Line, Vec<Point>>;

/// Result of the arrangement stage.
#[derive(Clone, Debug)]
pub struct Arrangement {
    pub precision: Precision,
    /// Deduplicated candidate lines in first-occurrence order.
    pub candidates: Vec<Line>,
    pub nodes: NodeMap,
    /// Every line with its nodes sorted by distance from the line's origin.
    pub lines: LineMap,
}

/// Build the full arrangement for `predictors` at prevalence `rho`.
///
/// Fails only if some line's nodes cannot be ordered.
pub fn build_arrangement(
    rho: f64,
    predictors: &[Predictor],
    precision: Precision,
) -> Result<Arrangement> {
    let candidates = candidate_lines(rho, predictors, precision);
    let raw = intersection_nodes(&candidates, precision);
    let raw_len = raw.len();
    let split = unmerge_nodes(raw);
    let split_len = split.len();
    let nodes = merge_nodes(&split);
    let lines = sort_line_nodes(line_nodes(&nodes))?;
    debug!(
        precision = precision.0,
        candidates = candidates.len(),
        raw = raw_len,
        unmerged = split_len,
        merged = nodes.len(),
        lines = lines.len(),
        "arrangement built"
    );
    Ok(Arrangement {
        precision,
        candidates,
        nodes,
        lines,
    })
}

#[cfg(test)]
mod tests;
