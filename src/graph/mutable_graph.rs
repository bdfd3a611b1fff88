use crate::graph::base_graph::BaseGraph;

pub trait MutableGraph: BaseGraph {
    /// Returns `false` if the vertex already existed.
    fn add_vertex(&mut self, u: usize) -> bool;
    fn remove_vertex(&mut self, u: usize);
    /// Inserts the undirected edge between two existing vertices. Returns `false`
    /// if the edge was already present.
    fn add_edge(&mut self, u: usize, v: usize) -> bool;
    fn remove_edge(&mut self, u: usize, v: usize);
    fn new() -> Self;
    fn with_capacity(capacity: usize) -> Self;
    fn make_clique(&mut self, vertices: &[usize]) {
        for (i, v) in vertices.iter().enumerate() {
            for u in vertices.iter().skip(i + 1) {
                self.add_edge(*u, *v);
            }
        }
    }
}
