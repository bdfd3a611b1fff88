use crate::cleaner::GraphCleaner;
use crate::exact::BacktrackingColoring;
use crate::graph::{BaseGraph, Coloring, HashMapGraph};
use crate::lowerbound::{LowerboundHeuristic, MaxClique, TrivialLowerbound};
use crate::upperbound::{color_count, GreedyColoring, UpperboundHeuristic, VertexOrdering};
use crate::util::should_stop;
#[cfg(feature = "log")]
use log::info;
use std::cmp::max;

pub type Lowerbound = usize;
pub type Upperbound = usize;
pub type DynamicUpperbound = fn(&HashMapGraph) -> Coloring;
pub type DynamicExact = fn(&HashMapGraph, Lowerbound, Upperbound) -> ComputationResult;
pub type DynamicLowerbound = fn(&HashMapGraph, Upperbound) -> Lowerbound;

#[derive(Clone, Copy)]
pub enum LowerboundHeuristicType {
    Trivial,
    Clique,
    Custom(DynamicLowerbound),
}

impl Default for LowerboundHeuristicType {
    fn default() -> Self {
        Self::Clique
    }
}

impl LowerboundHeuristicType {
    pub(crate) fn compute(&self, graph: &HashMapGraph, upperbound: Upperbound) -> Lowerbound {
        match self {
            LowerboundHeuristicType::Trivial => TrivialLowerbound::with_graph(graph).compute(),
            LowerboundHeuristicType::Clique => {
                MaxClique::with_upperbound(graph, upperbound).compute()
            }
            LowerboundHeuristicType::Custom(heuristic) => heuristic(graph, upperbound),
        }
    }
}

#[derive(Clone, Copy)]
pub enum UpperboundHeuristicType {
    DegreeDescending,
    Shuffle(u64),
    Insertion,
    SmallestLast,
    All,
    Custom(DynamicUpperbound),
}

impl Default for UpperboundHeuristicType {
    fn default() -> Self {
        Self::All
    }
}

impl UpperboundHeuristicType {
    pub(crate) fn compute(&self, graph: &HashMapGraph) -> Coloring {
        let greedy = |ordering| GreedyColoring::with_ordering(graph, ordering).compute_upperbound();
        match self {
            UpperboundHeuristicType::DegreeDescending => greedy(VertexOrdering::DegreeDescending),
            UpperboundHeuristicType::Shuffle(seed) => greedy(VertexOrdering::Shuffle(*seed)),
            UpperboundHeuristicType::Insertion => greedy(VertexOrdering::Insertion),
            UpperboundHeuristicType::SmallestLast => greedy(VertexOrdering::SmallestLast),
            UpperboundHeuristicType::All => {
                let a = greedy(VertexOrdering::DegreeDescending);
                let b = greedy(VertexOrdering::SmallestLast);
                let c = greedy(VertexOrdering::Insertion);
                let mut best = a;
                if color_count(&best) > color_count(&b) {
                    best = b;
                }
                if color_count(&best) > color_count(&c) {
                    best = c;
                }
                best
            }
            UpperboundHeuristicType::Custom(heuristic) => heuristic(graph),
        }
    }
}

#[derive(Clone, Copy)]
pub enum AtomSolverType {
    None,
    Backtracking,
    Custom(DynamicExact),
}

impl Default for AtomSolverType {
    fn default() -> Self {
        Self::Backtracking
    }
}

impl AtomSolverType {
    pub(crate) fn compute(
        &self,
        graph: &HashMapGraph,
        lowerbound: Lowerbound,
        upperbound: Upperbound,
    ) -> ComputationResult {
        match self {
            AtomSolverType::None => ComputationResult::Bounds(Bounds {
                lowerbound,
                upperbound,
            }),
            AtomSolverType::Backtracking => {
                BacktrackingColoring::with_bounds(graph, lowerbound, upperbound).compute()
            }
            AtomSolverType::Custom(solver) => solver(graph, lowerbound, upperbound),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct AlgorithmTypes {
    pub atom_solver: AtomSolverType,
    pub upperbound: UpperboundHeuristicType,
    pub lowerbound: LowerboundHeuristicType,
}

impl AlgorithmTypes {
    impl_setter!(self, atom_solver, AtomSolverType);
    impl_setter!(self, upperbound, UpperboundHeuristicType);
    impl_setter!(self, lowerbound, LowerboundHeuristicType);
}

/// Bounds on the chromatic number, and the exact value once it is known.
///
/// Whenever `exact` is known, `lower == upper == exact`. `ready` is `false` if the
/// computation was interrupted before it could finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChromaticResult {
    lower: Option<usize>,
    upper: Option<usize>,
    exact: Option<usize>,
    ready: bool,
}

impl ChromaticResult {
    pub fn exact(value: usize) -> Self {
        Self {
            lower: Some(value),
            upper: Some(value),
            exact: Some(value),
            ready: true,
        }
    }

    pub fn bounds(lower: Lowerbound, upper: Upperbound) -> Self {
        debug_assert!(lower <= upper);
        if lower == upper {
            Self::exact(lower)
        } else {
            Self {
                lower: Some(lower),
                upper: Some(upper),
                exact: None,
                ready: true,
            }
        }
    }

    pub(crate) fn interrupted(mut self) -> Self {
        if self.exact.is_none() {
            self.ready = false;
        }
        self
    }

    /// Chromatic number of a graph assembled from pieces whose chromatic number is
    /// the maximum over `piece + offset`.
    pub(crate) fn combine_max<I: IntoIterator<Item = (ChromaticResult, usize)>>(
        results: I,
    ) -> Self {
        let mut lower: Option<usize> = None;
        let mut upper: Option<usize> = Some(0);
        let mut ready = true;
        let mut empty = true;
        for (result, offset) in results {
            empty = false;
            lower = max(lower, result.lower.map(|l| l + offset));
            upper = match (upper, result.upper) {
                (Some(a), Some(b)) => Some(max(a, b + offset)),
                _ => None,
            };
            ready &= result.ready;
        }
        if empty {
            return Self::exact(0);
        }
        match (lower, upper) {
            (Some(l), Some(u)) if l == u => Self::exact(l),
            _ => Self {
                lower,
                upper,
                exact: None,
                ready,
            },
        }
    }

    pub fn lower(&self) -> Option<usize> {
        self.lower
    }

    pub fn upper(&self) -> Option<usize> {
        self.upper
    }

    pub fn exact_value(&self) -> Option<usize> {
        self.exact
    }

    pub fn is_exact(&self) -> bool {
        self.exact.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

#[derive(Clone, Copy)]
pub struct Solver {
    algorithm_types: AlgorithmTypes,
    use_cleaning: bool,
    clique_threshold: usize,
    odd_wheel_limit: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            algorithm_types: AlgorithmTypes::default(),
            use_cleaning: true,
            clique_threshold: 0,
            odd_wheel_limit: 1000,
        }
    }
}

impl Solver {
    pub fn default_heuristic() -> Self {
        Self::default().algorithm_types(AlgorithmTypes::default().atom_solver(AtomSolverType::None))
    }

    pub fn default_exact() -> Self {
        Self::default()
    }

    impl_setter!(self, algorithm_types, AlgorithmTypes);
    impl_setter!(self, use_cleaning, bool);
    impl_setter!(self, clique_threshold, usize);
    impl_setter!(self, odd_wheel_limit, usize);

    pub(crate) fn get_odd_wheel_limit(&self) -> usize {
        self.odd_wheel_limit
    }

    pub fn solve(&self, graph: &HashMapGraph) -> ChromaticResult {
        self.compute_exact(graph, self.use_cleaning)
    }

    /// Colors `graph` with the configured heuristic, storing the coloring in its color
    /// register, and returns the number of colors used.
    pub fn upperbound(&self, graph: &mut HashMapGraph) -> Upperbound {
        graph.reset();
        let coloring = self.algorithm_types.upperbound.compute(graph);
        debug_assert!(graph.is_proper_coloring(&coloring));
        graph.apply_coloring(&coloring);
        color_count(&coloring)
    }

    /// Lower bound that never exceeds `upperbound`.
    pub fn lowerbound(&self, graph: &HashMapGraph, upperbound: Upperbound) -> Lowerbound {
        let trivial = TrivialLowerbound::with_graph(graph).compute();
        if upperbound <= self.clique_threshold {
            return trivial;
        }
        let lowerbound = self.algorithm_types.lowerbound.compute(graph, upperbound);
        if lowerbound > upperbound {
            trivial
        } else {
            max(lowerbound, trivial)
        }
    }

    pub fn compute_exact(&self, graph: &HashMapGraph, use_cleaning: bool) -> ChromaticResult {
        #[cfg(feature = "log")]
        info!(
            "attempting to solve graph with {} vertices and {} edges",
            graph.order(),
            graph.size()
        );
        if graph.order() == 0 {
            return ChromaticResult::exact(0);
        }
        let mut working = graph.clone();
        let upperbound = self.upperbound(&mut working);
        let lowerbound = self.lowerbound(&working, upperbound);
        #[cfg(feature = "log")]
        info!("initial bounds: {} <= x <= {}", lowerbound, upperbound);
        if lowerbound == upperbound {
            return ChromaticResult::exact(upperbound);
        }

        let (atom, lowerbound, upperbound) = if use_cleaning {
            let cleaned = GraphCleaner::new(*self, lowerbound, upperbound).clean(&working);
            #[cfg(feature = "log")]
            info!("cleaning finished: {:?}", cleaned.information);
            match cleaned.residual_bounds() {
                Some((lower, upper)) => (cleaned.graph, lower, upper),
                None => return cleaned.result,
            }
        } else {
            (working, lowerbound, upperbound)
        };

        if should_stop() {
            return ChromaticResult::bounds(lowerbound, upperbound).interrupted();
        }
        #[cfg(feature = "log")]
        info!("searching atom with {} vertices", atom.order());
        match self
            .algorithm_types
            .atom_solver
            .compute(&atom, lowerbound, upperbound)
        {
            ComputationResult::ComputedChromaticNumber(k) => ChromaticResult::exact(k),
            ComputationResult::Bounds(bounds) => {
                let result = ChromaticResult::bounds(bounds.lowerbound, bounds.upperbound);
                if should_stop() {
                    result.interrupted()
                } else {
                    result
                }
            }
        }
    }
}

pub trait AtomSolver<'a> {
    fn with_graph(graph: &'a HashMapGraph) -> Self
    where
        Self: Sized;
    fn with_bounds(graph: &'a HashMapGraph, lowerbound: usize, upperbound: usize) -> Self
    where
        Self: Sized;
    fn compute(self) -> ComputationResult;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub lowerbound: usize,
    pub upperbound: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputationResult {
    ComputedChromaticNumber(usize),
    Bounds(Bounds),
}
