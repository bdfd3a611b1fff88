use std::cmp::Ordering;
use std::fmt::Debug;

pub trait BaseGraph: Clone + Debug {
    fn degree(&self, u: usize) -> usize;
    fn order(&self) -> usize;
    /// Number of undirected edges.
    fn size(&self) -> usize;
    fn has_vertex(&self, u: usize) -> bool;
    fn has_edge(&self, u: usize, v: usize) -> bool;
    fn is_clique(&self, vertices: &[usize]) -> bool;
    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_>;
    fn min_vertex_by<F: FnMut(&usize, &usize) -> Ordering>(&self, cmp: F) -> Option<usize>;
    fn max_vertex_by<F: FnMut(&usize, &usize) -> Ordering>(&self, cmp: F) -> Option<usize>;

    fn min_vertex(&self) -> Option<usize> {
        self.min_vertex_by(|a, b| a.cmp(b))
    }

    fn max_vertex(&self) -> Option<usize> {
        self.max_vertex_by(|a, b| a.cmp(b))
    }

    fn max_degree(&self) -> usize {
        self.vertices().map(|v| self.degree(v)).max().unwrap_or(0)
    }

    /// Edge count divided by the squared vertex count.
    fn density(&self) -> f64 {
        let n = self.order();
        if n == 0 {
            return 0.0;
        }
        self.size() as f64 / (n * n) as f64
    }

    fn is_complete(&self) -> bool {
        let n = self.order();
        self.vertices().all(|v| self.degree(v) + 1 == n)
    }
}
