pub use base_graph::BaseGraph;
pub use hash_map_graph::{Coloring, HashMapGraph, HashMapGraphDfs};
pub use mutable_graph::MutableGraph;

mod base_graph;
pub mod connectivity;
mod hash_map_graph;
mod mutable_graph;
