//! Interaction graph construction from sorted lines.

use std::collections::BTreeMap;

use crate::arrangement::LineMap;

use super::types::{Edge, EdgeKind, InteractionGraph};

impl InteractionGraph {
    /// Consecutive nodes on a line form an edge. Edges on the triangle sides
    /// bound one face, all others two. A node belongs to as many faces as it
    /// has neighbors, one fewer if it sits on a triangle side.
    pub fn from_lines(lines: &LineMap) -> Self {
        let mut search_edges: BTreeMap<Edge, usize> = BTreeMap::new();
        let mut edge_kind = BTreeMap::new();
        for (line, nodes) in lines {
            let kind = if line.is_boundary() {
                EdgeKind::Exterior
            } else {
                EdgeKind::Interior
            };
            for pair in nodes.windows(2) {
                let e = Edge::new(pair[0], pair[1]);
                *search_edges.entry(e).or_insert(0) += kind.multiplicity();
                edge_kind.insert(e, kind);
            }
        }

        let mut interactions: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for e in search_edges.keys() {
            interactions.entry(e.a).or_default().push(e.b);
            interactions.entry(e.b).or_default().push(e.a);
        }

        let mut search_nodes = BTreeMap::new();
        for (&n, children) in &interactions {
            let exterior = children
                .iter()
                .any(|&c| edge_kind.get(&Edge::new(n, c)) == Some(&EdgeKind::Exterior));
            let expected = children.len() - usize::from(exterior);
            if expected > 0 {
                search_nodes.insert(n, expected);
            }
        }

        Self {
            search_edges,
            edge_kind,
            interactions,
            search_nodes,
        }
    }
}
