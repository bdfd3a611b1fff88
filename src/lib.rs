//! Exact chromatic numbers of undirected simple graphs.
//!
//! The [`solver::Solver`] brackets the chromatic number between a greedy coloring
//! and a maximum clique, shrinks or splits the graph with the reductions of
//! [`cleaner::GraphCleaner`] and closes the remaining gap with an exhaustive
//! backtracking search.
#[macro_use]
mod util;

pub(crate) mod datastructures;

pub mod cleaner;
pub mod exact;
pub mod graph;
pub mod io;
pub mod lowerbound;
pub mod solver;
pub mod upperbound;

#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;
#[cfg(feature = "cli")]
pub mod timeout;

pub use cleaner::GraphCleaner;
pub use solver::{ChromaticResult, Solver};
