//! Face recovery: interaction graph and breadth-first face search.
//!
//! Purpose
//! - Turn the sorted lines of an arrangement into an undirected graph with a
//!   face budget per edge (one on a triangle side, two inside) and per node.
//! - Enumerate the bounded faces one by one, consuming budgets, so that every
//!   face is reported exactly once.
//!
//! Why this design
//! - The arrangement is not guaranteed to be a clean planar embedding after
//!   rounding, so faces are recovered combinatorially: a face never walks one
//!   line twice, and a closed path is rejected while it still encloses a node
//!   or an unconsumed chord. Breadth-first order returns the smallest cycle.
//! - The search is an explicit FIFO worklist with an expansion budget; a
//!   search that cannot close a face reports a retryable error instead of
//!   looping.
//!
//! Code cross-refs: `arrangement::{NodeMap, LineMap}`, `geom2::contains_strict`.

mod graph;
mod search;
mod types;

pub use search::get_polygons;
pub use types::{Edge, EdgeKind, InteractionGraph, Polygon, SearchCfg};
