use thiserror::Error;

use crate::geom2::{Line, Point};

/// Errors raised while building the arrangement or recovering its faces.
#[derive(Debug, Error)]
pub enum CspError {
    /// Neither origin rule could order the nodes of a line.
    #[error("nodes of line {line} could not be sorted: {nodes:?}")]
    UnsortableLine { line: Line, nodes: Vec<Point> },

    /// The face search ran out of partial paths before closing a face.
    #[error("face search from {start} exhausted its frontier without closing a face")]
    FaceSearchExhausted { start: Point },

    #[error("face search from {start} exceeded {budget} expansions")]
    SearchBudgetExceeded { start: Point, budget: usize },

    /// A recovered face used a node that was owed no further faces.
    #[error("node {node} was used by more faces than expected")]
    NodeBudgetExhausted { node: Point },

    #[error("edge {from} - {to} was used by more faces than expected")]
    EdgeBudgetExhausted { from: Point, to: Point },

    #[error("recovered polygons cover {area}, expected {expected}")]
    AreaMismatch { area: f64, expected: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CspError {
    /// Failures that a rerun at a finer coordinate precision may resolve.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CspError::FaceSearchExhausted { .. }
                | CspError::SearchBudgetExceeded { .. }
                | CspError::AreaMismatch { .. }
        )
    }
}

/// Convenience type alias for results using [`CspError`].
pub type Result<T> = std::result::Result<T, CspError>;
