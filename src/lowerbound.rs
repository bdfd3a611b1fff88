use crate::datastructures::BitSet;
use crate::graph::{BaseGraph, HashMapGraph};
use crate::util::should_stop;
use fxhash::FxHashMap;

pub trait LowerboundHeuristic {
    fn compute(self) -> usize;
}

/// Trivial bound: 0 for the empty graph, 1 without edges and 2 otherwise.
pub struct TrivialLowerbound<'a> {
    graph: &'a HashMapGraph,
}

impl<'a> TrivialLowerbound<'a> {
    pub fn with_graph(graph: &'a HashMapGraph) -> Self {
        Self { graph }
    }
}

impl<'a> LowerboundHeuristic for TrivialLowerbound<'a> {
    fn compute(self) -> usize {
        if self.graph.order() == 0 {
            0
        } else if self.graph.size() == 0 {
            1
        } else {
            2
        }
    }
}

/// Bron–Kerbosch maximum clique search with pivoting.
///
/// Vertices are mapped to positions `0..n` so that the candidate set `P` and the
/// excluded set `X` are bit sets. The search stops as soon as it finds a clique as
/// large as the known upper bound.
pub struct MaxClique<'a> {
    graph: &'a HashMapGraph,
    upperbound: usize,
    vertices: Vec<usize>,
    neighborhoods: Vec<BitSet>,
    clique: Vec<usize>,
    best: Vec<usize>,
}

impl<'a> MaxClique<'a> {
    pub fn with_graph(graph: &'a HashMapGraph) -> Self {
        Self::with_upperbound(graph, graph.order())
    }

    pub fn with_upperbound(graph: &'a HashMapGraph, upperbound: usize) -> Self {
        let mut vertices: Vec<usize> = graph.vertices().collect();
        vertices.sort_unstable();
        let position: FxHashMap<usize, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (*v, i))
            .collect();
        let neighborhoods = vertices
            .iter()
            .map(|v| {
                let mut neighbors = BitSet::new(vertices.len());
                for u in graph.neighborhood(*v) {
                    neighbors.set_bit(position[&u]);
                }
                neighbors
            })
            .collect();
        Self {
            graph,
            upperbound,
            vertices,
            neighborhoods,
            clique: Vec::new(),
            best: Vec::new(),
        }
    }

    /// Runs the search and returns the largest clique found.
    pub fn compute_clique(mut self) -> Vec<usize> {
        let n = self.vertices.len();
        if n > 0 {
            self.expand(BitSet::new_all_set(n), BitSet::new(n));
        }
        self.best.iter().map(|i| self.vertices[*i]).collect()
    }

    fn is_done(&self) -> bool {
        self.best.len() >= self.upperbound
    }

    fn expand(&mut self, mut candidates: BitSet, mut excluded: BitSet) {
        if candidates.empty() {
            if excluded.empty() && self.clique.len() > self.best.len() {
                self.best = self.clique.clone();
            }
            return;
        }
        if self.clique.len() + candidates.cardinality() <= self.best.len() || should_stop() {
            return;
        }

        let mut union = candidates.clone();
        union.or(&excluded);
        let pivot = union
            .iter()
            .max_by(|a, b| {
                self.graph
                    .degree(self.vertices[*a])
                    .cmp(&self.graph.degree(self.vertices[*b]))
                    .then(b.cmp(a))
            })
            .unwrap_or(0);

        let mut branches = candidates.clone();
        branches.and_not(&self.neighborhoods[pivot]);
        for v in branches.iter() {
            let mut next_candidates = candidates.clone();
            next_candidates.and(&self.neighborhoods[v]);
            let mut next_excluded = excluded.clone();
            next_excluded.and(&self.neighborhoods[v]);

            self.clique.push(v);
            self.expand(next_candidates, next_excluded);
            self.clique.pop();
            if self.is_done() {
                return;
            }

            candidates.unset_bit(v);
            excluded.set_bit(v);
        }
    }
}

impl<'a> LowerboundHeuristic for MaxClique<'a> {
    fn compute(self) -> usize {
        self.compute_clique().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    #[test]
    fn finds_maximum_clique() {
        let mut graph = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]);
        for v in 6..=9 {
            graph.add_vertex(v);
        }
        graph.make_clique(&[6, 7, 8, 9]);
        graph.add_edge(5, 6);

        let clique = MaxClique::with_graph(&graph).compute_clique();
        assert_eq!(clique.len(), 4);
        assert!(graph.is_clique(&clique));
    }

    #[test]
    fn cycle_has_clique_two() {
        let graph = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]);
        assert_eq!(MaxClique::with_graph(&graph).compute(), 2);
    }

    #[test]
    fn stops_at_upperbound() {
        let mut graph = HashMapGraph::new();
        for v in 0..6 {
            graph.add_vertex(v);
        }
        graph.make_clique(&[0, 1, 2, 3, 4, 5]);
        let clique = MaxClique::with_upperbound(&graph, 3).compute_clique();
        assert!(clique.len() >= 3);
        assert!(graph.is_clique(&clique));
    }

    #[test]
    fn trivial_bounds() {
        let empty = HashMapGraph::from_edges(&[]);
        assert_eq!(TrivialLowerbound::with_graph(&empty).compute(), 0);
        assert_eq!(MaxClique::with_graph(&empty).compute(), 0);

        let mut edgeless = HashMapGraph::new();
        edgeless.add_vertex(3);
        edgeless.add_vertex(4);
        assert_eq!(TrivialLowerbound::with_graph(&edgeless).compute(), 1);
        assert_eq!(MaxClique::with_graph(&edgeless).compute(), 1);

        let edge = HashMapGraph::from_edges(&[(1, 2)]);
        assert_eq!(TrivialLowerbound::with_graph(&edge).compute(), 2);
    }
}
