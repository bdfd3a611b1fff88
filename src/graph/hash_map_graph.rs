use crate::graph::base_graph::BaseGraph;
use crate::graph::mutable_graph::MutableGraph;
use fxhash::FxHashMap;
use fxhash::FxHashSet;
use std::cmp::Ordering;

/// Assignment of colors `0..k` to vertex ids.
pub type Coloring = FxHashMap<usize, usize>;

/// Undirected simple graph over arbitrary `usize` vertex ids.
///
/// Besides the adjacency sets every graph carries a color register, written by the
/// coloring heuristics and cleared by [`HashMapGraph::reset`], and a `level`
/// recording how many universal vertices were peeled off to obtain this graph from
/// its ancestor.
#[derive(Clone, Debug)]
pub struct HashMapGraph {
    data: FxHashMap<usize, FxHashSet<usize>>,
    colors: Coloring,
    level: usize,
}

impl HashMapGraph {
    pub fn from_edges(edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::new();
        for (u, v) in edges.iter().copied() {
            graph.add_vertex(u);
            graph.add_vertex(v);
            graph.add_edge(u, v);
        }
        graph
    }

    pub fn neighborhood_set(&self, u: usize) -> &FxHashSet<usize> {
        match self.data.get(&u) {
            Some(neighbors) => neighbors,
            None => panic!("vertex {} not found", u),
        }
    }

    pub fn dfs(&self, u: usize) -> HashMapGraphDfs<'_> {
        assert!(self.data.contains_key(&u), "vertex {} not found", u);
        let mut visited = FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        visited.insert(u);
        HashMapGraphDfs {
            graph: self,
            stack: vec![u],
            visited,
        }
    }

    pub fn connected_components(&self) -> Vec<FxHashSet<usize>> {
        self.separate(&FxHashSet::default())
    }

    /// Vertex sets of the connected components of the graph after removing `separator`.
    pub fn separate(&self, separator: &FxHashSet<usize>) -> Vec<FxHashSet<usize>> {
        let mut components: Vec<FxHashSet<_>> = Vec::with_capacity(2);

        let mut stack: Vec<_> = Vec::with_capacity(self.data.len());
        let mut visited = FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        for u in self.data.keys().copied() {
            if separator.contains(&u) || visited.contains(&u) {
                continue;
            }
            stack.push(u);
            visited.insert(u);
            let mut component: FxHashSet<_> = FxHashSet::default();
            component.insert(u);
            while let Some(v) = stack.pop() {
                for x in self.neighborhood_set(v).iter() {
                    if component.contains(x) || separator.contains(x) {
                        continue;
                    }
                    stack.push(*x);
                    component.insert(*x);
                    visited.insert(*x);
                }
            }
            components.push(component);
        }
        components
    }

    /// Fresh graph on `vertices` with all edges of `self` between them. Ids missing
    /// from `self` are ignored. Colors are not carried over and the level starts at zero.
    pub fn vertex_induced(&self, vertices: &FxHashSet<usize>) -> Self {
        let data: FxHashMap<usize, FxHashSet<usize>> = vertices
            .iter()
            .filter_map(|vertex| self.data.get_key_value(vertex))
            .map(|(vertex, neighborhood)| {
                (
                    *vertex,
                    neighborhood
                        .iter()
                        .copied()
                        .filter(|x| vertices.contains(x))
                        .collect(),
                )
            })
            .collect();
        Self {
            data,
            colors: Coloring::default(),
            level: 0,
        }
    }

    /// Some vertex adjacent to every other vertex, preferring the smallest id.
    pub fn universal_vertex(&self) -> Option<usize> {
        let n = self.order();
        self.data
            .iter()
            .filter(|(_, neighbors)| neighbors.len() + 1 == n)
            .map(|(v, _)| *v)
            .min()
    }

    /// The common degree if every vertex has the same degree.
    pub fn regularity(&self) -> Option<usize> {
        let mut degrees = self.data.values().map(|neighbors| neighbors.len());
        let first = degrees.next()?;
        if degrees.all(|d| d == first) {
            Some(first)
        } else {
            None
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    pub fn color(&self, u: usize) -> Option<usize> {
        assert!(self.data.contains_key(&u), "vertex {} not found", u);
        self.colors.get(&u).copied()
    }

    pub fn set_color(&mut self, u: usize, color: usize) {
        assert!(self.data.contains_key(&u), "vertex {} not found", u);
        self.colors.insert(u, color);
    }

    pub fn colors(&self) -> &Coloring {
        &self.colors
    }

    /// Replaces the color register with `coloring`, ignoring ids not in the graph.
    pub fn apply_coloring(&mut self, coloring: &Coloring) {
        let data = &self.data;
        self.colors = coloring
            .iter()
            .filter(|(v, _)| data.contains_key(v))
            .map(|(v, c)| (*v, *c))
            .collect();
    }

    /// Clears the color register and the level.
    pub fn reset(&mut self) {
        self.colors.clear();
        self.level = 0;
    }

    pub fn is_properly_colored(&self) -> bool {
        self.is_proper_coloring(&self.colors)
    }

    /// Every vertex has a color and no edge joins two vertices of the same color.
    pub fn is_proper_coloring(&self, coloring: &Coloring) -> bool {
        self.data.iter().all(|(v, neighbors)| match coloring.get(v) {
            Some(c) => neighbors.iter().all(|u| coloring.get(u) != Some(c)),
            None => false,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_symmetric(&self) -> bool {
        self.data.iter().all(|(v, neighbors)| {
            neighbors
                .iter()
                .all(|u| self.data.get(u).map_or(false, |x| x.contains(v)))
        })
    }
}

pub struct HashMapGraphDfs<'a> {
    graph: &'a HashMapGraph,
    stack: Vec<usize>,
    visited: FxHashSet<usize>,
}

impl<'a> Iterator for HashMapGraphDfs<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for c in self.graph.neighborhood_set(current).iter().copied() {
            if self.visited.insert(c) {
                self.stack.push(c);
            }
        }
        Some(current)
    }
}

impl MutableGraph for HashMapGraph {
    fn add_vertex(&mut self, u: usize) -> bool {
        if self.data.contains_key(&u) {
            return false;
        }
        self.data.insert(u, FxHashSet::default());
        true
    }

    fn remove_vertex(&mut self, u: usize) {
        if let Some(neighbors) = self.data.remove(&u) {
            for i in neighbors.iter() {
                let removed = self.data.get_mut(i).map_or(false, |x| x.remove(&u));
                debug_assert!(removed, "edge {} {} stored in one direction only", u, i);
            }
        }
        self.colors.remove(&u);
    }

    fn add_edge(&mut self, u: usize, v: usize) -> bool {
        assert_ne!(u, v, "self loops are not supported");
        assert!(self.data.contains_key(&u), "vertex {} not found", u);
        assert!(self.data.contains_key(&v), "vertex {} not found", v);
        if self.neighborhood_set(u).contains(&v) {
            return false;
        }
        if let Some(x) = self.data.get_mut(&u) {
            x.insert(v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.insert(u);
        }
        true
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        if let Some(x) = self.data.get_mut(&u) {
            x.remove(&v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.remove(&u);
        }
    }

    fn new() -> Self {
        HashMapGraph {
            data: FxHashMap::default(),
            colors: Coloring::default(),
            level: 0,
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMapGraph {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            colors: Coloring::default(),
            level: 0,
        }
    }
}

impl BaseGraph for HashMapGraph {
    fn degree(&self, u: usize) -> usize {
        self.neighborhood_set(u).len()
    }

    fn order(&self) -> usize {
        self.data.len()
    }

    fn size(&self) -> usize {
        self.data.values().map(|neighbors| neighbors.len()).sum::<usize>() / 2
    }

    fn has_vertex(&self, u: usize) -> bool {
        self.data.contains_key(&u)
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighborhood_set(u).contains(&v)
    }

    fn is_clique(&self, vertices: &[usize]) -> bool {
        for (i, v) in vertices.iter().enumerate() {
            for u in vertices.iter().skip(i + 1) {
                if !self.has_edge(*v, *u) {
                    return false;
                }
            }
        }
        true
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data.keys().copied())
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.neighborhood_set(u).iter().copied())
    }

    fn min_vertex_by<F: FnMut(&usize, &usize) -> Ordering>(&self, cmp: F) -> Option<usize> {
        self.data.keys().copied().min_by(cmp)
    }

    fn max_vertex_by<F: FnMut(&usize, &usize) -> Ordering>(&self, cmp: F) -> Option<usize> {
        self.data.keys().copied().max_by(cmp)
    }
}
