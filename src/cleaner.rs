use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use crate::solver::{ChromaticResult, Lowerbound, Solver, Upperbound};
use fxhash::{FxHashMap, FxHashSet};
use std::cmp::{max, min};

#[cfg(feature = "log")]
use log::debug;

/// Reductions in the order the cleaner tries them.
#[derive(PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Debug)]
pub enum CleaningStage {
    Complete,
    Leaves,
    Components,
    Universal,
    OddWheel,
    Regular,
    CutVertex,
    Atomic,
}

impl CleaningStage {
    pub fn increment(&self) -> Option<Self> {
        match self {
            Self::Complete => Some(Self::Leaves),
            Self::Leaves => Some(Self::Components),
            Self::Components => Some(Self::Universal),
            Self::Universal => Some(Self::OddWheel),
            Self::OddWheel => Some(Self::Regular),
            Self::Regular => Some(Self::CutVertex),
            Self::CutVertex => Some(Self::Atomic),
            Self::Atomic => None,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningInformation {
    pub n_pruned_vertices: usize,
    pub n_universal_vertices: usize,
    pub n_components: usize,
    pub n_cut_vertices: usize,
    pub resolved_by: Option<CleaningStage>,
}

pub struct CleaningResult {
    pub result: ChromaticResult,
    /// Working graph after leaf pruning. Its chromatic number equals that of the
    /// input unless a stage resolved the input on its own.
    pub graph: HashMapGraph,
    pub information: CleaningInformation,
}

impl CleaningResult {
    /// Bounds still to be closed by searching `graph`, or `None` if the cleaner
    /// settled the chromatic number.
    pub fn residual_bounds(&self) -> Option<(Lowerbound, Upperbound)> {
        if self.information.resolved_by.is_some() || self.result.is_exact() {
            return None;
        }
        match (self.result.lower(), self.result.upper()) {
            (Some(lower), Some(upper)) => Some((lower, upper)),
            _ => None,
        }
    }
}

enum StageOutcome {
    Resolved(ChromaticResult),
    Continue,
}

/// Structure-preserving reductions applied before exhaustive search.
///
/// Stages that split the graph solve every piece with a full [`Solver`] run, so
/// pieces are cleaned again recursively.
pub struct GraphCleaner {
    solver: Solver,
    lowerbound: Lowerbound,
    upperbound: Upperbound,
    information: CleaningInformation,
}

impl GraphCleaner {
    pub fn new(solver: Solver, lowerbound: Lowerbound, upperbound: Upperbound) -> Self {
        Self {
            solver,
            lowerbound: min(lowerbound, upperbound),
            upperbound,
            information: CleaningInformation::default(),
        }
    }

    pub fn clean(mut self, graph: &HashMapGraph) -> CleaningResult {
        let mut graph = graph.clone();
        let mut stage = Some(CleaningStage::Complete);
        while let Some(current) = stage {
            if self.lowerbound == self.upperbound {
                break;
            }
            if let StageOutcome::Resolved(result) = self.apply(current, &mut graph) {
                #[cfg(feature = "log")]
                debug!("resolved by {:?}: {:?}", current, result);
                self.information.resolved_by = Some(current);
                return CleaningResult {
                    result,
                    graph,
                    information: self.information,
                };
            }
            if self.lowerbound == self.upperbound {
                self.information.resolved_by = Some(current);
            }
            stage = current.increment();
        }
        CleaningResult {
            result: ChromaticResult::bounds(self.lowerbound, self.upperbound),
            graph,
            information: self.information,
        }
    }

    fn apply(&mut self, stage: CleaningStage, graph: &mut HashMapGraph) -> StageOutcome {
        match stage {
            CleaningStage::Complete => {
                if graph.is_complete() {
                    StageOutcome::Resolved(ChromaticResult::exact(graph.order()))
                } else {
                    StageOutcome::Continue
                }
            }
            CleaningStage::Leaves => self.prune_leaves(graph),
            CleaningStage::Components => self.split_components(graph),
            CleaningStage::Universal => self.split_universal(graph),
            CleaningStage::OddWheel => {
                if graph.order() < self.solver.get_odd_wheel_limit() {
                    let bound = odd_wheel_bound(graph);
                    self.tighten(bound, self.upperbound);
                }
                StageOutcome::Continue
            }
            CleaningStage::Regular => self.regular_shortcut(graph),
            CleaningStage::CutVertex => self.split_cut_vertex(graph),
            CleaningStage::Atomic => StageOutcome::Continue,
        }
    }

    fn tighten(&mut self, lowerbound: Lowerbound, upperbound: Upperbound) {
        self.lowerbound = max(self.lowerbound, lowerbound);
        self.upperbound = min(self.upperbound, upperbound);
        debug_assert!(self.lowerbound <= self.upperbound);
    }

    /// Removes vertices of degree at most one until none are left. Such a vertex can
    /// always take a color its single neighbor does not use.
    fn prune_leaves(&mut self, graph: &mut HashMapGraph) -> StageOutcome {
        let had_edges = graph.size() > 0;
        let mut stack: Vec<usize> = graph.vertices().filter(|v| graph.degree(*v) <= 1).collect();
        while let Some(v) = stack.pop() {
            if !graph.has_vertex(v) {
                continue;
            }
            let neighbors: Vec<usize> = graph.neighborhood(v).collect();
            graph.remove_vertex(v);
            self.information.n_pruned_vertices += 1;
            stack.extend(neighbors.into_iter().filter(|u| graph.degree(*u) <= 1));
        }
        if graph.order() == 0 {
            #[cfg(feature = "log")]
            debug!("graph is a forest");
            let chromatic_number = if had_edges { 2 } else { 1 };
            return StageOutcome::Resolved(ChromaticResult::exact(chromatic_number));
        }
        StageOutcome::Continue
    }

    fn split_components(&mut self, graph: &HashMapGraph) -> StageOutcome {
        let components = graph.connected_components();
        if components.len() <= 1 {
            return StageOutcome::Continue;
        }
        self.information.n_components += components.len();
        #[cfg(feature = "log")]
        debug!("splitting {} components", components.len());
        let solver = self.solver;
        StageOutcome::Resolved(ChromaticResult::combine_max(components.iter().map(
            |component| {
                let piece = graph.vertex_induced(component);
                (solver.compute_exact(&piece, true), 0)
            },
        )))
    }

    /// Peels universal vertices off level by level. Every peeled vertex needs a color
    /// of its own, so a fragment at level `l` contributes its chromatic number plus `l`.
    fn split_universal(&mut self, graph: &HashMapGraph) -> StageOutcome {
        if graph.universal_vertex().is_none() {
            return StageOutcome::Continue;
        }
        let mut root = graph.clone();
        root.set_level(0);
        let mut stack = vec![root];
        let mut leaves = Vec::new();
        while let Some(mut fragment) = stack.pop() {
            match fragment.universal_vertex() {
                Some(u) if fragment.order() > 1 => {
                    fragment.remove_vertex(u);
                    self.information.n_universal_vertices += 1;
                    for component in fragment.connected_components() {
                        let mut sub_graph = fragment.vertex_induced(&component);
                        sub_graph.set_level(fragment.level() + 1);
                        stack.push(sub_graph);
                    }
                }
                _ => leaves.push(fragment),
            }
        }
        #[cfg(feature = "log")]
        debug!(
            "peeled {} universal vertices, {} fragments remain",
            self.information.n_universal_vertices,
            leaves.len()
        );
        let solver = self.solver;
        StageOutcome::Resolved(ChromaticResult::combine_max(
            leaves
                .iter()
                .map(|leaf| (solver.compute_exact(leaf, true), leaf.level())),
        ))
    }

    /// Brooks' theorem: a connected graph that is neither complete nor an odd cycle
    /// can be colored with its maximum degree many colors.
    fn regular_shortcut(&mut self, graph: &HashMapGraph) -> StageOutcome {
        let k = match graph.regularity() {
            Some(k) => k,
            None => return StageOutcome::Continue,
        };
        if !graph.is_connected() || graph.is_complete() {
            return StageOutcome::Continue;
        }
        if k == 2 {
            let chromatic_number = if graph.order() % 2 == 0 { 2 } else { 3 };
            return StageOutcome::Resolved(ChromaticResult::exact(chromatic_number));
        }
        #[cfg(feature = "log")]
        debug!("graph is {}-regular", k);
        self.tighten(self.lowerbound, k);
        StageOutcome::Continue
    }

    /// Splits into biconnected blocks. Blocks meet in single cut vertices, and the
    /// colorings of the blocks can be permuted to agree on them, so no offset is added.
    fn split_cut_vertex(&mut self, graph: &HashMapGraph) -> StageOutcome {
        let decomposition = graph.block_decomposition();
        if decomposition.blocks.len() <= 1 {
            return StageOutcome::Continue;
        }
        self.information.n_cut_vertices += decomposition.cut_vertices.len();
        #[cfg(feature = "log")]
        debug!(
            "splitting into {} blocks at {} cut vertices",
            decomposition.blocks.len(),
            decomposition.cut_vertices.len()
        );
        let solver = self.solver;
        StageOutcome::Resolved(ChromaticResult::combine_max(
            decomposition.blocks.iter().map(|block| {
                let piece = graph.vertex_induced(block);
                (solver.compute_exact(&piece, true), 0)
            }),
        ))
    }
}

/// Two-colors the subgraph induced by `vertices` in place. Returns whether it has an
/// edge and whether it is bipartite.
fn induced_parity(graph: &HashMapGraph, vertices: &FxHashSet<usize>) -> (bool, bool) {
    let mut side: FxHashMap<usize, bool> = FxHashMap::default();
    let mut stack = Vec::new();
    let mut has_edge = false;
    for root in vertices.iter().copied() {
        if side.contains_key(&root) {
            continue;
        }
        side.insert(root, false);
        stack.push(root);
        while let Some(a) = stack.pop() {
            let s = side[&a];
            for b in graph
                .neighborhood_set(a)
                .iter()
                .filter(|b| vertices.contains(b))
            {
                has_edge = true;
                match side.get(b) {
                    Some(t) if *t == s => return (true, false),
                    Some(_) => {}
                    None => {
                        side.insert(*b, !s);
                        stack.push(*b);
                    }
                }
            }
        }
    }
    (has_edge, true)
}

/// 4 if some neighborhood is not bipartite, 3 if some neighborhood contains an edge.
fn odd_wheel_bound(graph: &HashMapGraph) -> Lowerbound {
    let mut bound = 0;
    for v in graph.vertices() {
        match induced_parity(graph, graph.neighborhood_set(v)) {
            (false, _) => {}
            (true, false) => return 4,
            (true, true) => bound = 3,
        }
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> GraphCleaner {
        GraphCleaner::new(Solver::default(), 0, usize::MAX)
    }

    fn bowtie() -> HashMapGraph {
        HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 3)])
    }

    /// Two copies of K4 minus an edge, joined at their degree two vertices.
    fn cubic_with_triangles() -> HashMapGraph {
        HashMapGraph::from_edges(&[
            (1, 2),
            (1, 3),
            (2, 3),
            (2, 4),
            (3, 4),
            (5, 6),
            (5, 7),
            (6, 7),
            (6, 8),
            (7, 8),
            (1, 5),
            (4, 8),
        ])
    }

    fn resolved(outcome: StageOutcome) -> ChromaticResult {
        match outcome {
            StageOutcome::Resolved(result) => result,
            StageOutcome::Continue => panic!("stage did not resolve"),
        }
    }

    #[test]
    fn complete_graph() {
        let mut graph = HashMapGraph::new();
        for v in 1..=4 {
            graph.add_vertex(v);
        }
        graph.make_clique(&[1, 2, 3, 4]);
        let cleaned = cleaner().clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(4));
        assert_eq!(
            cleaned.information.resolved_by,
            Some(CleaningStage::Complete)
        );
    }

    #[test]
    fn star_is_pruned_away() {
        let graph = HashMapGraph::from_edges(&[(1, 2), (1, 3), (1, 4), (1, 5), (1, 6)]);
        let cleaned = GraphCleaner::new(Solver::default(), 1, 3).clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(2));
        assert_eq!(cleaned.information.resolved_by, Some(CleaningStage::Leaves));
        assert_eq!(cleaned.information.n_pruned_vertices, 6);
        assert_eq!(cleaned.graph.order(), 0);
    }

    #[test]
    fn pendant_paths_are_pruned() {
        let graph = HashMapGraph::from_edges(&[
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 1),
            (5, 6),
            (6, 7),
            (7, 8),
        ]);
        let mut working = graph.clone();
        let mut cleaner = cleaner();
        assert!(matches!(
            cleaner.prune_leaves(&mut working),
            StageOutcome::Continue
        ));
        assert_eq!(working.order(), 5);
        assert_eq!(cleaner.information.n_pruned_vertices, 3);
    }

    #[test]
    fn edgeless_graph_is_pruned_to_one() {
        let mut graph = HashMapGraph::new();
        graph.add_vertex(1);
        graph.add_vertex(2);
        let result = resolved(cleaner().prune_leaves(&mut graph));
        assert_eq!(result, ChromaticResult::exact(1));
    }

    #[test]
    fn universal_vertex_adds_one() {
        // wheel around a five cycle
        let mut edges: Vec<(usize, usize)> = (1..=5).map(|v| (v, v % 5 + 1)).collect();
        edges.extend((1..=5).map(|v| (0, v)));
        let graph = HashMapGraph::from_edges(&edges);

        let mut cleaner = cleaner();
        let result = resolved(cleaner.split_universal(&graph));
        assert_eq!(result, ChromaticResult::exact(4));
        assert_eq!(cleaner.information.n_universal_vertices, 1);

        let mut rest = graph.clone();
        rest.remove_vertex(0);
        let components = Solver::default().compute_exact(&rest, true);
        assert_eq!(result.exact_value(), components.exact_value().map(|x| x + 1));
    }

    #[test]
    fn nested_universal_vertices() {
        let graph = bowtie();
        let mut cleaner = cleaner();
        let result = resolved(cleaner.split_universal(&graph));
        assert_eq!(result, ChromaticResult::exact(3));
        // vertex 3, then one vertex of each remaining edge
        assert_eq!(cleaner.information.n_universal_vertices, 3);
    }

    #[test]
    fn cut_vertex_adds_nothing() {
        let graph = bowtie();
        let mut cleaner = cleaner();
        let result = resolved(cleaner.split_cut_vertex(&graph));
        assert_eq!(result, ChromaticResult::exact(3));
        assert_eq!(cleaner.information.n_cut_vertices, 1);

        let separator: FxHashSet<usize> = [3].iter().copied().collect();
        for mut component in graph.separate(&separator) {
            component.insert(3);
            let piece = graph.vertex_induced(&component);
            assert_eq!(piece.order(), 3);
            assert_eq!(
                Solver::default().compute_exact(&piece, true),
                ChromaticResult::exact(3)
            );
        }
    }

    #[test]
    fn cut_vertex_between_different_pieces() {
        // five cycle and a triangle sharing vertex 1, plus a K4 hanging off vertex 3
        let mut graph = HashMapGraph::from_edges(&[
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 1),
            (1, 6),
            (6, 7),
            (7, 1),
        ]);
        for v in 8..=10 {
            graph.add_vertex(v);
        }
        graph.make_clique(&[3, 8, 9, 10]);
        let cleaned = GraphCleaner::new(Solver::default(), 3, 5).clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(4));
        assert_eq!(
            cleaned.information.resolved_by,
            Some(CleaningStage::CutVertex)
        );
    }

    #[test]
    fn long_chain_of_blocks_is_split_at_once() {
        // pentagons glued at one vertex each
        let blocks = 2000;
        let mut edges = Vec::new();
        for b in 0..blocks {
            let base = 4 * b;
            for i in 0..5 {
                edges.push((base + i, base + (i + 1) % 5));
            }
        }
        let graph = HashMapGraph::from_edges(&edges);

        let cleaned = GraphCleaner::new(Solver::default(), 2, 3).clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(3));
        assert_eq!(
            cleaned.information.resolved_by,
            Some(CleaningStage::CutVertex)
        );
        assert_eq!(cleaned.information.n_cut_vertices, blocks - 1);

        assert_eq!(
            Solver::default().compute_exact(&graph, true),
            ChromaticResult::exact(3)
        );
    }

    #[test]
    fn components_take_maximum() {
        let graph = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 7), (7, 4)]);
        let cleaned = cleaner().clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(3));
        assert_eq!(
            cleaned.information.resolved_by,
            Some(CleaningStage::Components)
        );
        assert_eq!(cleaned.information.n_components, 2);
    }

    #[test]
    fn odd_wheel_bounds() {
        let mut edges: Vec<(usize, usize)> = (1..=5).map(|v| (v, v % 5 + 1)).collect();
        edges.extend((1..=5).map(|v| (0, v)));
        assert_eq!(odd_wheel_bound(&HashMapGraph::from_edges(&edges)), 4);
        assert_eq!(odd_wheel_bound(&bowtie()), 3);
        assert_eq!(
            odd_wheel_bound(&HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 1)])),
            0
        );
    }

    #[test]
    fn regular_graph_resolved_without_search() {
        let graph = cubic_with_triangles();
        assert_eq!(graph.regularity(), Some(3));
        assert!(graph.is_one_connected());

        let cleaned = GraphCleaner::new(Solver::default(), 2, 4).clean(&graph);
        assert_eq!(cleaned.result, ChromaticResult::exact(3));
        assert_eq!(cleaned.information.resolved_by, Some(CleaningStage::Regular));
        assert!(cleaned.residual_bounds().is_none());
    }

    #[test]
    fn odd_cycle_is_regular() {
        let edges: Vec<_> = (1..=7).map(|v| (v, v % 7 + 1)).collect();
        let cleaned = GraphCleaner::new(Solver::default(), 2, 3).clean(&HashMapGraph::from_edges(&edges));
        assert_eq!(cleaned.result, ChromaticResult::exact(3));
        assert_eq!(cleaned.information.resolved_by, Some(CleaningStage::Regular));
    }

    #[test]
    fn atomic_graph_keeps_bounds() {
        // Mycielski graph of the five cycle: no reduction applies
        let mut edges: Vec<(usize, usize)> = (0..5).map(|i| (i, (i + 1) % 5)).collect();
        for i in 0..5 {
            edges.push((5 + i, (i + 1) % 5));
            edges.push((5 + i, (i + 4) % 5));
            edges.push((5 + i, 10));
        }
        let graph = HashMapGraph::from_edges(&edges);
        let cleaned = GraphCleaner::new(Solver::default(), 2, 5).clean(&graph);
        assert_eq!(cleaned.residual_bounds(), Some((2, 5)));
        assert_eq!(cleaned.information.resolved_by, None);
        assert_eq!(cleaned.graph.order(), 11);
    }
}
