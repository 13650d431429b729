use std::collections::BTreeMap;

use crate::geom2::Point;

/// Closed ring of nodes: first == last, consecutive nodes adjacent.
pub type Polygon = Vec<Point>;

/// Undirected edge between two adjacent nodes on one line, stored with `a <= b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: Point,
    pub b: Point,
}

impl Edge {
    pub fn new(p: Point, q: Point) -> Self {
        if p <= q {
            Self { a: p, b: q }
        } else {
            Self { a: q, b: p }
        }
    }
}

/// Whether an edge lies on a triangle side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Exterior,
    Interior,
}

impl EdgeKind {
    /// Number of faces an edge of this kind bounds.
    pub fn multiplicity(self) -> usize {
        match self {
            EdgeKind::Exterior => 1,
            EdgeKind::Interior => 2,
        }
    }
}

/// Adjacency and face budgets derived from the sorted lines.
#[derive(Clone, Debug, Default)]
pub struct InteractionGraph {
    /// Edge -> number of faces it still has to bound.
    pub search_edges: BTreeMap<Edge, usize>,
    pub edge_kind: BTreeMap<Edge, EdgeKind>,
    /// Node -> neighbors, in edge order.
    pub interactions: BTreeMap<Point, Vec<Point>>,
    /// Node -> number of faces it belongs to. Nodes owed no face are absent.
    pub search_nodes: BTreeMap<Point, usize>,
}

impl InteractionGraph {
    pub fn neighbors(&self, p: Point) -> &[Point] {
        self.interactions.get(&p).map_or(&[], Vec::as_slice)
    }

    pub fn edge_budget(&self, e: &Edge) -> usize {
        self.search_edges.get(e).copied().unwrap_or(0)
    }

    /// Sum of expected face counts over all nodes.
    pub fn expected_incidences(&self) -> usize {
        self.search_nodes.values().sum()
    }
}

/// Face search limits.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Partial paths expanded per face before giving up.
    pub max_expansions: usize,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            max_expansions: 100_000,
        }
    }
}
