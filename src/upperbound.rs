use crate::datastructures::BinaryQueue;
use crate::graph::{BaseGraph, Coloring, HashMapGraph, MutableGraph};
use fxhash::FxHashSet;
use rand::prelude::*;

pub trait UpperboundHeuristic {
    fn compute_upperbound(self) -> Coloring;
}

/// Order in which the greedy heuristic visits the vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexOrdering {
    /// Highest degree first, ties broken by smaller id.
    DegreeDescending,
    /// Seeded uniform shuffle.
    Shuffle(u64),
    /// Ascending id, which is the order readers insert vertices in.
    Insertion,
    /// Reverse of the order obtained by repeatedly removing a minimum degree vertex.
    SmallestLast,
}

impl Default for VertexOrdering {
    fn default() -> Self {
        Self::DegreeDescending
    }
}

impl VertexOrdering {
    pub fn order(&self, graph: &HashMapGraph) -> Vec<usize> {
        let mut vertices: Vec<usize> = graph.vertices().collect();
        vertices.sort_unstable();
        match self {
            VertexOrdering::DegreeDescending => {
                vertices.sort_by(|a, b| graph.degree(*b).cmp(&graph.degree(*a)));
                vertices
            }
            VertexOrdering::Shuffle(seed) => {
                let mut rng: StdRng = SeedableRng::seed_from_u64(*seed);
                vertices.shuffle(&mut rng);
                vertices
            }
            VertexOrdering::Insertion => vertices,
            VertexOrdering::SmallestLast => smallest_last(graph, &vertices),
        }
    }
}

fn smallest_last(graph: &HashMapGraph, vertices: &[usize]) -> Vec<usize> {
    let mut working = graph.clone();
    let mut queue = BinaryQueue::new();
    for v in vertices.iter().copied() {
        queue.insert(v, working.degree(v) as i64);
    }
    let mut stack = Vec::with_capacity(vertices.len());
    while let Some((v, _)) = queue.pop_min() {
        let neighbors: Vec<usize> = working.neighborhood(v).collect();
        working.remove_vertex(v);
        for u in neighbors {
            debug_assert!(queue.contains(u));
            queue.insert(u, working.degree(u) as i64);
        }
        stack.push(v);
    }
    stack.reverse();
    stack
}

/// Number of colors used by `coloring`, assuming colors `0..k`.
pub fn color_count(coloring: &Coloring) -> usize {
    coloring.values().max().map_or(0, |c| c + 1)
}

/// Assigns every vertex the smallest color not used by an already colored neighbor.
pub struct GreedyColoring<'a> {
    graph: &'a HashMapGraph,
    ordering: VertexOrdering,
}

impl<'a> GreedyColoring<'a> {
    pub fn with_graph(graph: &'a HashMapGraph) -> Self {
        Self {
            graph,
            ordering: VertexOrdering::default(),
        }
    }

    pub fn with_ordering(graph: &'a HashMapGraph, ordering: VertexOrdering) -> Self {
        Self { graph, ordering }
    }
}

impl<'a> UpperboundHeuristic for GreedyColoring<'a> {
    fn compute_upperbound(self) -> Coloring {
        let mut coloring = Coloring::default();
        let mut used = FxHashSet::default();
        for v in self.ordering.order(self.graph) {
            used.clear();
            used.extend(
                self.graph
                    .neighborhood(v)
                    .filter_map(|u| coloring.get(&u).copied()),
            );
            let mut color = 0;
            while used.contains(&color) {
                color += 1;
            }
            coloring.insert(v, color);
        }
        coloring
    }
}
