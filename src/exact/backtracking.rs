use crate::exact::Feasibility;
use crate::graph::{BaseGraph, Coloring, HashMapGraph};
use crate::solver::{AtomSolver, Bounds, ComputationResult};
use crate::upperbound::VertexOrdering;
use crate::util::should_stop;
use fxhash::FxHashMap;
use std::cmp::{max, min};

#[cfg(feature = "log")]
use log::{debug, info};

/// Exhaustive search for the chromatic number.
///
/// Vertices are colored in a fixed order. Each vertex tries the colors `0..k` in
/// increasing order and the search backtracks once a vertex runs out of legal
/// colors. The search is iterative, so deep graphs do not exhaust the stack. A vertex
/// never opens more than one new color class, which prunes permutations of the same
/// coloring.
pub struct BacktrackingColoring<'a> {
    graph: &'a HashMapGraph,
    lowerbound: usize,
    upperbound: usize,
    order: Vec<usize>,
    earlier_neighbors: Vec<Vec<usize>>,
}

impl<'a> BacktrackingColoring<'a> {
    pub fn new(graph: &'a HashMapGraph, lowerbound: usize, upperbound: usize) -> Self {
        let order = VertexOrdering::DegreeDescending.order(graph);
        let position: FxHashMap<usize, usize> =
            order.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let earlier_neighbors = order
            .iter()
            .enumerate()
            .map(|(i, v)| {
                graph
                    .neighborhood(*v)
                    .map(|u| position[&u])
                    .filter(|j| *j < i)
                    .collect()
            })
            .collect();
        Self {
            graph,
            lowerbound: min(lowerbound, upperbound),
            upperbound,
            order,
            earlier_neighbors,
        }
    }

    /// Decides whether the graph can be colored with `colors` colors.
    pub fn is_colorable(&self, colors: usize) -> Feasibility {
        let n = self.order.len();
        if n == 0 {
            return Feasibility::Feasible(Coloring::default());
        }
        if colors == 0 {
            return Feasibility::Infeasible;
        }
        if n <= colors {
            return Feasibility::Feasible(
                self.order.iter().enumerate().map(|(i, v)| (*v, i)).collect(),
            );
        }
        match colors {
            1 => {
                if self.graph.size() == 0 {
                    Feasibility::Feasible(self.order.iter().map(|v| (*v, 0)).collect())
                } else {
                    Feasibility::Infeasible
                }
            }
            2 => match self.graph.two_coloring() {
                Some(coloring) => Feasibility::Feasible(coloring),
                None => Feasibility::Infeasible,
            },
            _ => self.backtrack(colors),
        }
    }

    fn backtrack(&self, colors: usize) -> Feasibility {
        let n = self.order.len();
        let mut assignment: Vec<Option<usize>> = vec![None; n];
        // open[i] is the number of color classes used by the first i vertices
        let mut open = vec![0; n + 1];
        let mut position = 0;
        loop {
            if should_stop() {
                return Feasibility::Aborted;
            }
            let first = assignment[position].map_or(0, |c| c + 1);
            let limit = min(colors, open[position] + 1);
            let neighbors = &self.earlier_neighbors[position];
            let next = (first..limit)
                .find(|c| neighbors.iter().all(|j| assignment[*j] != Some(*c)));
            match next {
                Some(c) => {
                    assignment[position] = Some(c);
                    open[position + 1] = max(open[position], c + 1);
                    position += 1;
                    if position == n {
                        let coloring = self
                            .order
                            .iter()
                            .zip(assignment.iter())
                            .filter_map(|(v, c)| c.map(|c| (*v, c)))
                            .collect();
                        return Feasibility::Feasible(coloring);
                    }
                }
                None => {
                    assignment[position] = None;
                    if position == 0 {
                        return Feasibility::Infeasible;
                    }
                    position -= 1;
                }
            }
        }
    }

    /// Smallest feasible color count between the bounds, together with its coloring.
    /// The coloring is missing when the upper bound itself is optimal. On interruption
    /// the error carries the best upper bound proven so far.
    fn descend(&self) -> Result<(usize, Option<Coloring>), usize> {
        let mut best: (usize, Option<Coloring>) = (self.upperbound, None);
        let floor = max(self.lowerbound, 1);
        let mut k = self.upperbound;
        while k > floor {
            k -= 1;
            #[cfg(feature = "log")]
            debug!("testing {}-colorability of {} vertices", k, self.order.len());
            match self.is_colorable(k) {
                Feasibility::Feasible(coloring) => best = (k, Some(coloring)),
                Feasibility::Infeasible => break,
                Feasibility::Aborted => return Err(best.0),
            }
        }
        Ok(best)
    }

    /// Chromatic number together with a witness coloring, if the search finished
    /// and found one below the upper bound.
    pub fn compute_coloring(&self) -> Option<(usize, Option<Coloring>)> {
        if self.order.is_empty() {
            return Some((0, Some(Coloring::default())));
        }
        self.descend().ok()
    }
}

impl<'a> AtomSolver<'a> for BacktrackingColoring<'a> {
    fn with_graph(graph: &'a HashMapGraph) -> Self {
        Self::new(graph, 0, graph.order())
    }

    fn with_bounds(graph: &'a HashMapGraph, lowerbound: usize, upperbound: usize) -> Self {
        Self::new(graph, lowerbound, upperbound)
    }

    fn compute(self) -> ComputationResult {
        if self.order.is_empty() {
            return ComputationResult::ComputedChromaticNumber(0);
        }
        match self.descend() {
            Ok((k, _)) => {
                #[cfg(feature = "log")]
                info!("chromatic number of {} vertices is {}", self.order.len(), k);
                ComputationResult::ComputedChromaticNumber(k)
            }
            Err(upperbound) => ComputationResult::Bounds(Bounds {
                lowerbound: self.lowerbound,
                upperbound,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MutableGraph;

    fn cycle(n: usize) -> HashMapGraph {
        let edges: Vec<_> = (1..=n).map(|v| (v, v % n + 1)).collect();
        HashMapGraph::from_edges(&edges)
    }

    fn grotzsch() -> HashMapGraph {
        let mut edges: Vec<(usize, usize)> = (0..5).map(|i| (i, (i + 1) % 5)).collect();
        for i in 0..5 {
            edges.push((5 + i, (i + 1) % 5));
            edges.push((5 + i, (i + 4) % 5));
            edges.push((5 + i, 10));
        }
        HashMapGraph::from_edges(&edges)
    }

    #[test]
    fn feasibility() {
        let graph = cycle(5);
        let solver = BacktrackingColoring::with_graph(&graph);
        assert!(!solver.is_colorable(2).is_feasible());
        let coloring = solver.is_colorable(3).coloring().unwrap();
        assert!(graph.is_proper_coloring(&coloring));
        assert!(coloring.values().all(|c| *c < 3));
    }

    #[test]
    fn shortcuts() {
        let mut edgeless = HashMapGraph::new();
        for v in 0..4 {
            edgeless.add_vertex(v);
        }
        let solver = BacktrackingColoring::with_graph(&edgeless);
        assert!(solver.is_colorable(1).is_feasible());
        assert!(!solver.is_colorable(0).is_feasible());

        let graph = cycle(8);
        let solver = BacktrackingColoring::with_graph(&graph);
        assert!(!solver.is_colorable(1).is_feasible());
        let coloring = solver.is_colorable(2).coloring().unwrap();
        assert!(graph.is_proper_coloring(&coloring));
    }

    #[test]
    fn cycle_chromatic_numbers() {
        for n in 3..9 {
            let graph = cycle(n);
            let expected = if n % 2 == 0 { 2 } else { 3 };
            match BacktrackingColoring::with_bounds(&graph, 1, 4).compute() {
                ComputationResult::ComputedChromaticNumber(k) => assert_eq!(k, expected),
                _ => panic!("search did not finish"),
            }
        }
    }

    #[test]
    fn triangle_free_graph_needs_four() {
        let graph = grotzsch();
        let solver = BacktrackingColoring::with_bounds(&graph, 2, 6);
        assert!(!solver.is_colorable(3).is_feasible());
        let (k, coloring) = solver.compute_coloring().unwrap();
        assert_eq!(k, 4);
        assert!(graph.is_proper_coloring(&coloring.unwrap()));
    }

    #[test]
    fn stops_at_lowerbound() {
        let graph = cycle(7);
        let (k, coloring) = BacktrackingColoring::with_bounds(&graph, 3, 3)
            .compute_coloring()
            .unwrap();
        assert_eq!(k, 3);
        assert!(coloring.is_none());
        match BacktrackingColoring::with_bounds(&graph, 3, 5).compute() {
            ComputationResult::ComputedChromaticNumber(k) => assert_eq!(k, 3),
            _ => panic!("search did not finish"),
        }
    }

    #[test]
    fn empty_graph() {
        let graph = HashMapGraph::new();
        match BacktrackingColoring::with_graph(&graph).compute() {
            ComputationResult::ComputedChromaticNumber(k) => assert_eq!(k, 0),
            _ => panic!("search did not finish"),
        }
    }
}
