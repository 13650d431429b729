//! Breadth-first face search over the interaction graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, trace};

use crate::arrangement::NodeMap;
use crate::geom2::{contains_strict, Line, Point};
use crate::{CspError, Result};

use super::types::{Edge, InteractionGraph, Polygon, SearchCfg};

/// Recover every face of the arrangement.
///
/// Faces are searched one at a time from the smallest node still owed a
/// face; each found face consumes one unit of its nodes' and edges' budgets.
/// The graph itself is not modified.
pub fn get_polygons(
    graph: &InteractionGraph,
    nodes: &NodeMap,
    cfg: SearchCfg,
) -> Result<Vec<Polygon>> {
    FaceRunner::new(graph, nodes, cfg).run()
}

/// A path from the start node with the lines it has walked along.
struct PartialPath {
    path: Vec<Point>,
    covered: BTreeSet<Line>,
}

/// Search state shared across faces: remaining budgets and faces found.
struct FaceRunner<'a> {
    graph: &'a InteractionGraph,
    nodes: &'a NodeMap,
    cfg: SearchCfg,
    edges_left: BTreeMap<Edge, usize>,
    nodes_left: BTreeMap<Point, usize>,
    found: Vec<BTreeSet<Point>>,
}

impl<'a> FaceRunner<'a> {
    fn new(graph: &'a InteractionGraph, nodes: &'a NodeMap, cfg: SearchCfg) -> Self {
        Self {
            graph,
            nodes,
            cfg,
            edges_left: graph.search_edges.clone(),
            nodes_left: graph.search_nodes.clone(),
            found: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Polygon>> {
        let mut polygons = Vec::new();
        while let Some(&start) = self.nodes_left.keys().next() {
            let face = self.find_face(start)?;
            self.consume(&face)?;
            self.found.push(face.iter().copied().collect());
            polygons.push(face);
        }
        debug!(faces = polygons.len(), "face search done");
        Ok(polygons)
    }

    fn lines_of(&self, p: Point) -> Option<&'a BTreeSet<Line>> {
        self.nodes.get(&p)
    }

    /// Shortest admissible closed path from `start`.
    fn find_face(&self, start: Point) -> Result<Polygon> {
        let mut frontier = VecDeque::from([PartialPath {
            path: vec![start],
            covered: BTreeSet::new(),
        }]);
        let mut expansions = 0usize;
        while let Some(PartialPath { path, covered }) = frontier.pop_front() {
            let node = path[path.len() - 1];
            if !covered.is_empty() && node == start && self.is_minimal(&path) {
                trace!(%start, len = path.len(), expansions, "face closed");
                return Ok(path);
            }
            expansions += 1;
            if expansions > self.cfg.max_expansions {
                return Err(CspError::SearchBudgetExceeded {
                    start,
                    budget: self.cfg.max_expansions,
                });
            }
            let Some(node_lines) = self.lines_of(node) else {
                continue;
            };
            for &child in self.graph.neighbors(node) {
                let Some(child_lines) = self.lines_of(child) else {
                    continue;
                };
                let shared: BTreeSet<Line> =
                    node_lines.intersection(child_lines).copied().collect();
                // one face never walks the same line twice
                if !shared.is_disjoint(&covered) {
                    continue;
                }
                if child != start && path.contains(&child) {
                    continue;
                }
                if self.edges_left.get(&Edge::new(node, child)).copied().unwrap_or(0) == 0 {
                    continue;
                }
                let mut next = path.clone();
                next.push(child);
                let ring: BTreeSet<Point> = next.iter().copied().collect();
                if self.found.contains(&ring) {
                    continue;
                }
                frontier.push_back(PartialPath {
                    path: next,
                    covered: covered.union(&shared).copied().collect(),
                });
            }
        }
        Err(CspError::FaceSearchExhausted { start })
    }

    /// A closed path is a face unless it encloses a node that at least four
    /// of its corners see, or (when some node lies outside) it has a chord
    /// that is still an unconsumed edge.
    fn is_minimal(&self, path: &[Point]) -> bool {
        let ring = &path[..path.len() - 1];
        let mut any_outside = false;
        for &other in self.nodes.keys() {
            if path.contains(&other) {
                continue;
            }
            if contains_strict(path, other) {
                let seen_by = ring
                    .iter()
                    .filter(|&&r| self.graph.neighbors(r).contains(&other))
                    .count();
                if seen_by >= 4 {
                    return false;
                }
            } else {
                any_outside = true;
            }
        }
        if !any_outside {
            return true;
        }
        let sides: BTreeSet<Edge> = path.windows(2).map(|w| Edge::new(w[0], w[1])).collect();
        for (i, &a) in ring.iter().enumerate() {
            for &b in &ring[i + 1..] {
                let chord = Edge::new(a, b);
                if !sides.contains(&chord) && self.edges_left.get(&chord).is_some_and(|&n| n > 0) {
                    return false;
                }
            }
        }
        true
    }

    /// Decrease the budgets of the face's nodes and edges.
    fn consume(&mut self, face: &[Point]) -> Result<()> {
        for &node in &face[..face.len() - 1] {
            let left = self
                .nodes_left
                .get_mut(&node)
                .ok_or(CspError::NodeBudgetExhausted { node })?;
            *left -= 1;
            if *left == 0 {
                self.nodes_left.remove(&node);
            }
        }
        for w in face.windows(2) {
            let e = Edge::new(w[0], w[1]);
            let left = self
                .edges_left
                .get_mut(&e)
                .ok_or(CspError::EdgeBudgetExhausted { from: e.a, to: e.b })?;
            *left -= 1;
            if *left == 0 {
                self.edges_left.remove(&e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::LineMap;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn ring(pts: &[(f64, f64)]) -> Polygon {
        pts.iter().map(|&(x, y)| pt(x, y)).collect()
    }

    /// Nodes and lines from chains of points, one synthetic cost line per chain.
    fn chains(chains: &[&[(f64, f64)]]) -> (NodeMap, LineMap) {
        let mut nodes = NodeMap::new();
        let mut lines = LineMap::new();
        for (i, chain) in chains.iter().enumerate() {
            let line = Line::Cost {
                slope: i as f64 + 1.0,
                intercept: 0.0,
            };
            let pts = ring(chain);
            for &p in &pts {
                nodes.entry(p).or_default().insert(line);
            }
            lines.insert(line, pts);
        }
        (nodes, lines)
    }

    fn record(runner: &mut FaceRunner<'_>, face: Polygon) {
        runner.consume(&face).unwrap();
        runner.found.push(face.into_iter().collect());
    }

    /// Diamond W N E S around P, split into four triangles by a horizontal
    /// and a vertical line through P. W also bounds a pentagon to its left.
    fn diamond() -> (NodeMap, InteractionGraph) {
        let (l, w, p, e) = ((0.05, 0.3), (0.2, 0.3), (0.3, 0.3), (0.4, 0.3));
        let (n, s) = ((0.3, 0.4), (0.3, 0.2));
        let (u1, u2) = ((0.25, 0.55), (0.1, 0.45));
        let (nodes, lines) = chains(&[
            &[l, w, p, e],
            &[s, p, n],
            &[w, n],
            &[n, e],
            &[e, s],
            &[s, w],
            &[n, u1],
            &[u1, u2],
            &[u2, l],
        ]);
        (nodes, InteractionGraph::from_lines(&lines))
    }

    #[test]
    fn ring_around_a_well_connected_node_is_not_a_face() {
        let (nodes, g) = diamond();
        let mut runner = FaceRunner::new(&g, &nodes, SearchCfg::default());
        record(&mut runner, ring(&[(0.2, 0.3), (0.3, 0.3), (0.3, 0.4), (0.2, 0.3)]));
        record(&mut runner, ring(&[(0.2, 0.3), (0.3, 0.3), (0.3, 0.2), (0.2, 0.3)]));
        // the diamond W S E N is the shortest open cycle left, but all four
        // of its corners see P inside it
        let face = runner.find_face(pt(0.2, 0.3)).unwrap();
        assert_eq!(
            face,
            ring(&[(0.2, 0.3), (0.05, 0.3), (0.1, 0.45), (0.25, 0.55), (0.3, 0.4), (0.2, 0.3)])
        );
    }

    /// Square A B C D with chord A C; B also bounds two pentagons below.
    fn chorded_square() -> (NodeMap, InteractionGraph) {
        let (a, b, c, d) = ((0.2, 0.3), (0.3, 0.2), (0.4, 0.3), (0.3, 0.4));
        let (x, y, z) = ((0.3, 0.05), (0.1, 0.05), (0.1, 0.3));
        let (v, w) = ((0.5, 0.3), (0.5, 0.05));
        let (nodes, lines) = chains(&[
            &[a, b],
            &[b, c],
            &[a, c],
            &[a, d],
            &[d, c],
            &[b, x],
            &[x, y],
            &[y, z],
            &[z, a],
            &[c, v],
            &[v, w],
            &[w, x],
        ]);
        (nodes, InteractionGraph::from_lines(&lines))
    }

    #[test]
    fn cycle_split_by_an_open_chord_is_not_a_face() {
        let (nodes, g) = chorded_square();
        let mut runner = FaceRunner::new(&g, &nodes, SearchCfg::default());
        record(&mut runner, ring(&[(0.3, 0.2), (0.2, 0.3), (0.4, 0.3), (0.3, 0.2)]));
        // A C still owes the upper triangle a side, so the square is rejected
        let face = runner.find_face(pt(0.3, 0.2)).unwrap();
        assert_eq!(
            face,
            ring(&[(0.3, 0.2), (0.2, 0.3), (0.1, 0.3), (0.1, 0.05), (0.3, 0.05), (0.3, 0.2)])
        );

        record(&mut runner, ring(&[(0.2, 0.3), (0.3, 0.4), (0.4, 0.3), (0.2, 0.3)]));
        let square = ring(&[(0.3, 0.2), (0.2, 0.3), (0.3, 0.4), (0.4, 0.3), (0.3, 0.2)]);
        assert!(runner.is_minimal(&square));
    }

    #[test]
    fn reusing_a_spent_edge_is_an_error() {
        let (nodes, g) = diamond();
        let mut runner = FaceRunner::new(&g, &nodes, SearchCfg::default());
        let wpn = ring(&[(0.2, 0.3), (0.3, 0.3), (0.3, 0.4), (0.2, 0.3)]);
        record(&mut runner, wpn.clone());
        record(&mut runner, ring(&[(0.2, 0.3), (0.3, 0.3), (0.3, 0.2), (0.2, 0.3)]));
        match runner.consume(&wpn) {
            Err(CspError::EdgeBudgetExhausted { from, to }) => {
                assert_eq!((from, to), (pt(0.2, 0.3), pt(0.3, 0.3)));
            }
            other => panic!("unexpected result {other:?}"),
        }
        let not_an_edge = ring(&[(0.2, 0.3), (0.4, 0.3), (0.3, 0.4), (0.2, 0.3)]);
        assert!(matches!(
            runner.consume(&not_an_edge),
            Err(CspError::EdgeBudgetExhausted { .. })
        ));
    }
}
