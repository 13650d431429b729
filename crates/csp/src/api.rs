//! Curated surface for the command line crate and experiments (UNSTABLE).
//!
//! Important
//! - Convenience re-exports only. Breaking changes are allowed and expected.

// Geometry primitives
pub use crate::geom2::{polygon_area, polygon_centroid, Line, Point, Precision};
// Arrangement construction
pub use crate::arrangement::{build_arrangement, merge_nodes, unmerge_nodes, Arrangement, NodeMap};
// Face recovery
pub use crate::faces::{get_polygons, InteractionGraph, Polygon, SearchCfg};
// Partition drivers
pub use crate::cost::Predictor;
pub use crate::interval::{partition_intervals, IntervalPartition};
pub use crate::partition::{
    compute_partition, label_polygons, partition_with_retry, Face, Partition, PartitionCfg,
    PredictorArea,
};
