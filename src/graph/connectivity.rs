//! Connectivity tests on [`HashMapGraph`]: traversal based connectivity, cut vertices
//! via low-link depth-first search and breadth-first two-coloring.
use crate::graph::base_graph::BaseGraph;
use crate::graph::hash_map_graph::{Coloring, HashMapGraph};
use fxhash::{FxHashMap, FxHashSet};
use std::cmp::min;
use std::collections::VecDeque;

impl HashMapGraph {
    /// The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        match self.vertices().next() {
            Some(u) => self.dfs(u).count() == self.order(),
            None => true,
        }
    }

    /// All cut vertices.
    pub fn articulation_points(&self) -> FxHashSet<usize> {
        self.block_decomposition().cut_vertices
    }

    /// Maximal biconnected pieces and the cut vertices they share, found in a single
    /// low-link pass over every component.
    pub fn block_decomposition(&self) -> BlockDecomposition {
        let mut roots: Vec<usize> = self.vertices().collect();
        roots.sort_unstable();
        let mut search = LowLink::default();
        for root in roots {
            if !search.discovered.contains_key(&root) {
                self.low_link_from(root, &mut search);
            }
        }
        BlockDecomposition {
            blocks: search.blocks,
            cut_vertices: search.cut_vertices,
        }
    }

    /// Removing any single vertex leaves the remainder connected.
    pub fn is_one_connected(&self) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.vertices().all(|v| {
            let separator: FxHashSet<usize> = [v].iter().copied().collect();
            self.separate(&separator).len() <= 1
        })
    }

    /// Connected and free of cut vertices.
    pub fn is_two_connected(&self) -> bool {
        self.is_connected() && self.articulation_points().is_empty()
    }

    pub fn is_bipartite(&self) -> bool {
        self.two_coloring().is_some()
    }

    /// Breadth-first two-coloring with colors `0` and `1`, one search per component.
    pub fn two_coloring(&self) -> Option<Coloring> {
        let mut coloring = Coloring::default();
        let mut queue = VecDeque::new();
        let mut roots: Vec<usize> = self.vertices().collect();
        roots.sort_unstable();
        for root in roots {
            if coloring.contains_key(&root) {
                continue;
            }
            coloring.insert(root, 0);
            queue.push_back(root);
            while let Some(v) = queue.pop_front() {
                let color = coloring[&v];
                for u in self.neighborhood_set(v).iter() {
                    match coloring.get(u) {
                        Some(c) if *c == color => return None,
                        Some(_) => {}
                        None => {
                            coloring.insert(*u, 1 - color);
                            queue.push_back(*u);
                        }
                    }
                }
            }
        }
        Some(coloring)
    }

    /// Iterative depth-first search from `root`. A child `w` of `v` with
    /// `low[w] >= pre[v]` closes a block consisting of the vertices stacked since `w`
    /// plus `v`.
    fn low_link_from(&self, root: usize, search: &mut LowLink) {
        search.discover(root);
        if self.degree(root) == 0 {
            search.stack.pop();
            search.blocks.push([root].iter().copied().collect());
            return;
        }
        let mut frames = vec![Frame {
            vertex: root,
            parent: root,
            neighbors: self.neighborhood(root).collect(),
            next: 0,
        }];
        let mut root_children = 0;
        loop {
            let (v, parent, next) = match frames.last_mut() {
                Some(frame) => {
                    let next = frame.neighbors.get(frame.next).copied();
                    frame.next += 1;
                    (frame.vertex, frame.parent, next)
                }
                None => break,
            };
            match next {
                Some(w) if !search.discovered.contains_key(&w) => {
                    search.discover(w);
                    frames.push(Frame {
                        vertex: w,
                        parent: v,
                        neighbors: self.neighborhood(w).collect(),
                        next: 0,
                    });
                }
                Some(w) => {
                    if w != parent {
                        let low_v = min(search.low[&v], search.discovered[&w]);
                        search.low.insert(v, low_v);
                    }
                }
                None => {
                    frames.pop();
                    if v == root {
                        continue;
                    }
                    let low_parent = min(search.low[&parent], search.low[&v]);
                    search.low.insert(parent, low_parent);
                    if search.low[&v] < search.discovered[&parent] {
                        continue;
                    }
                    let mut block = FxHashSet::default();
                    block.insert(parent);
                    while let Some(x) = search.stack.pop() {
                        block.insert(x);
                        if x == v {
                            break;
                        }
                    }
                    search.blocks.push(block);
                    if parent == root {
                        root_children += 1;
                    } else {
                        search.cut_vertices.insert(parent);
                    }
                }
            }
        }
        search.stack.pop();
        if root_children > 1 {
            search.cut_vertices.insert(root);
        }
    }
}

/// Biconnected blocks of a graph. Bridges form blocks of two vertices and isolated
/// vertices blocks of one.
#[derive(Debug, Clone, Default)]
pub struct BlockDecomposition {
    pub blocks: Vec<FxHashSet<usize>>,
    pub cut_vertices: FxHashSet<usize>,
}

#[derive(Default)]
struct LowLink {
    count: usize,
    discovered: FxHashMap<usize, usize>,
    low: FxHashMap<usize, usize>,
    stack: Vec<usize>,
    blocks: Vec<FxHashSet<usize>>,
    cut_vertices: FxHashSet<usize>,
}

impl LowLink {
    fn discover(&mut self, v: usize) {
        self.count += 1;
        self.discovered.insert(v, self.count);
        self.low.insert(v, self.count);
        self.stack.push(v);
    }
}

struct Frame {
    vertex: usize,
    parent: usize,
    neighbors: Vec<usize>,
    next: usize,
}

#[cfg(test)]
mod tests {
    use crate::graph::{HashMapGraph, MutableGraph};

    fn bowtie() -> HashMapGraph {
        HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 3)])
    }

    fn cycle(n: usize) -> HashMapGraph {
        let edges: Vec<_> = (1..=n).map(|v| (v, v % n + 1)).collect();
        HashMapGraph::from_edges(&edges)
    }

    #[test]
    fn connected() {
        assert!(HashMapGraph::from_edges(&[]).is_connected());
        assert!(bowtie().is_connected());
        assert!(!HashMapGraph::from_edges(&[(1, 2), (3, 4)]).is_connected());
    }

    #[test]
    fn bowtie_has_single_articulation_point() {
        let points = bowtie().articulation_points();
        assert_eq!(points.len(), 1);
        assert!(points.contains(&3));
    }

    #[test]
    fn cut_vertex() {
        let graph = HashMapGraph::from_edges(&[
            (0, 1),
            (1, 2),
            (0, 2),
            (3, 4),
            (4, 5),
            (3, 5),
            (1, 4),
            (1, 5),
        ]);
        assert_eq!(graph.articulation_points().into_iter().collect::<Vec<_>>(), vec![1]);
        assert!(!graph.is_two_connected());
        assert!(!graph.is_one_connected());
    }

    #[test]
    fn no_cut_vertex() {
        let graph = HashMapGraph::from_edges(&[
            (0, 1),
            (1, 2),
            (0, 2),
            (3, 4),
            (4, 5),
            (3, 5),
            (0, 3),
            (1, 4),
        ]);
        assert!(graph.articulation_points().is_empty());
        assert!(graph.is_two_connected());
        assert!(graph.is_one_connected());
    }

    #[test]
    fn path_articulation_points() {
        let graph = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4)]);
        let mut points: Vec<_> = graph.articulation_points().into_iter().collect();
        points.sort_unstable();
        assert_eq!(points, vec![2, 3]);
    }

    #[test]
    fn connectivity_notions_agree() {
        let graphs = vec![
            bowtie(),
            cycle(5),
            cycle(6),
            HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 1), (1, 3), (4, 5)]),
        ];
        for graph in graphs {
            assert_eq!(graph.is_one_connected(), graph.is_two_connected());
        }
    }

    fn sorted_blocks(graph: &HashMapGraph) -> Vec<Vec<usize>> {
        let mut blocks: Vec<Vec<usize>> = graph
            .block_decomposition()
            .blocks
            .into_iter()
            .map(|block| {
                let mut block: Vec<usize> = block.into_iter().collect();
                block.sort_unstable();
                block
            })
            .collect();
        blocks.sort();
        blocks
    }

    #[test]
    fn blocks_of_bowtie_and_path() {
        assert_eq!(sorted_blocks(&bowtie()), vec![vec![1, 2, 3], vec![3, 4, 5]]);

        let path = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 4)]);
        assert_eq!(sorted_blocks(&path), vec![vec![1, 2], vec![2, 3], vec![3, 4]]);

        assert_eq!(sorted_blocks(&cycle(6)), vec![vec![1, 2, 3, 4, 5, 6]]);
    }

    #[test]
    fn blocks_of_disconnected_graph() {
        let mut graph = HashMapGraph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4), (5, 6)]);
        graph.add_vertex(7);
        assert_eq!(
            sorted_blocks(&graph),
            vec![vec![1, 2, 3], vec![3, 4], vec![5, 6], vec![7]]
        );
        let decomposition = graph.block_decomposition();
        assert_eq!(decomposition.cut_vertices.into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn blocks_of_long_chain() {
        // pentagons glued at one vertex each, deep enough to overflow a recursive search
        let blocks = 3000;
        let mut edges = Vec::new();
        for b in 0..blocks {
            let base = 4 * b;
            for i in 0..5 {
                edges.push((base + i, base + (i + 1) % 5));
            }
        }
        let graph = HashMapGraph::from_edges(&edges);
        let decomposition = graph.block_decomposition();
        assert_eq!(decomposition.blocks.len(), blocks);
        assert!(decomposition.blocks.iter().all(|block| block.len() == 5));
        assert_eq!(decomposition.cut_vertices.len(), blocks - 1);
    }

    #[test]
    fn bipartite() {
        assert!(cycle(6).is_bipartite());
        assert!(!cycle(5).is_bipartite());
        assert!(!bowtie().is_bipartite());

        let forest = HashMapGraph::from_edges(&[(1, 2), (2, 3), (4, 5)]);
        let coloring = forest.two_coloring().unwrap();
        assert!(forest.is_proper_coloring(&coloring));
        assert!(coloring.values().all(|c| *c < 2));
    }
}
