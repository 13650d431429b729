//! Cost space partition: best-predictor cells of the unit cost triangle.
//!
//! Pipeline
//! - `cost`: predictor cost planes and the equal-cost line of two predictors.
//! - `arrangement`: intersection nodes of all candidate lines inside the
//!   triangle, unmerge/merge of coincident nodes, nodes ordered along lines.
//! - `faces`: interaction graph with face multiplicities and the breadth-first
//!   face search that recovers every bounded cell exactly once.
//! - `partition`: labeling, area aggregation and the precision-escalation driver.
//! - `interval`: the coverage-free variant on a single parameter.
//!
//! API Policy
//! - Consumed by the `csp` command line crate in this workspace. Breaking
//!   changes are fine when they improve clarity.

pub mod api;
pub mod arrangement;
pub mod cost;
pub mod error;
pub mod faces;
pub mod geom2;
pub mod interval;
pub mod partition;

pub use error::{CspError, Result};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Area of the unit right triangle `{x, y >= 0, x + y <= 1}`.
pub const TRIANGLE_AREA: f64 = 0.5;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cost::{line_parameters, CostPlane, Predictor};
    pub use crate::faces::{Edge, EdgeKind, InteractionGraph, Polygon, SearchCfg};
    pub use crate::geom2::{Line, Point, Precision};
    pub use crate::partition::{
        compute_partition, partition_with_retry, Partition, PartitionCfg, PredictorArea,
    };
    pub use crate::{CspError, Result};
}
