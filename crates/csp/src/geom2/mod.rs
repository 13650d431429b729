//! Rounded 2D geometry of the cost triangle.
//!
//! Purpose
//! - Points and lines whose identity is the exact value after rounding to a
//!   decimal precision, so that they can key ordered maps and sets.
//! - Small polygon primitives (area, centroid, strict containment) used by
//!   the face search and the labeling step.
//!
//! Why rounded identity
//! - The same arrangement node is reached through different line pairs; rounding
//!   to a fixed number of digits makes those computations collide on one key.
//!   Degenerate collisions are resolved by `arrangement::{unmerge, merge}`.
//!
//! Code cross-refs: `arrangement::NodeMap`, `faces::InteractionGraph`

mod types;
mod util;

pub use types::{Line, Point, Precision};
pub use util::{contains_strict, polygon_area, polygon_centroid};
