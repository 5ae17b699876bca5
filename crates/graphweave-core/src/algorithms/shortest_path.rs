//! Unweighted (hop-count) shortest paths by breadth-first search.
//!
//! Directed edges are followed from source to dest only; undirected edges
//! in both directions. Each reached vertex records the edge through which it
//! was first discovered, forming a shortest-path tree rooted at the source.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::GraphTraversal;

/// Distances and tree edges from one source vertex.
///
/// Vertices that cannot be reached are absent from both maps. The source is
/// present at distance 0 and has no incoming tree edge.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<V, E> {
    source: V,
    distances: FxHashMap<V, usize>,
    /// Reached vertex -> (tree edge, parent vertex).
    parents: FxHashMap<V, (E, V)>,
}

impl<V: Eq + std::hash::Hash + Clone, E: Clone> ShortestPathTree<V, E> {
    /// Returns the source vertex.
    #[must_use]
    pub fn source(&self) -> &V {
        &self.source
    }

    /// Returns the hop count to `vertex`, or `None` if it was not reached.
    #[must_use]
    pub fn distance(&self, vertex: &V) -> Option<usize> {
        self.distances.get(vertex).copied()
    }

    /// Returns the tree edge through which `vertex` was first reached.
    #[must_use]
    pub fn incoming_edge(&self, vertex: &V) -> Option<&E> {
        self.parents.get(vertex).map(|(edge, _)| edge)
    }

    /// Returns the distance map.
    #[must_use]
    pub fn distances(&self) -> &FxHashMap<V, usize> {
        &self.distances
    }

    /// Returns every `(vertex, tree edge)` pair.
    pub fn incoming_edges(&self) -> impl Iterator<Item = (&V, &E)> + '_ {
        self.parents.iter().map(|(vertex, (edge, _))| (vertex, edge))
    }

    /// Returns true if `vertex` was reached.
    #[must_use]
    pub fn reaches(&self, vertex: &V) -> bool {
        self.distances.contains_key(vertex)
    }

    /// Returns the number of reached vertices, source included.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.distances.len()
    }

    /// Reconstructs the edges of a shortest path from the source to
    /// `target`. Empty for the source itself, `None` if unreached.
    #[must_use]
    pub fn path_to(&self, target: &V) -> Option<Vec<E>> {
        let mut edges = Vec::with_capacity(self.distance(target)?);
        let mut current = target;
        while let Some((edge, parent)) = self.parents.get(current) {
            edges.push(edge.clone());
            current = parent;
        }
        edges.reverse();
        Some(edges)
    }

    /// Reconstructs the vertices of a shortest path, both ends included.
    #[must_use]
    pub fn vertex_path_to(&self, target: &V) -> Option<Vec<V>> {
        let mut vertices = Vec::with_capacity(self.distance(target)? + 1);
        let mut current = target;
        vertices.push(current.clone());
        while let Some((_, parent)) = self.parents.get(current) {
            vertices.push(parent.clone());
            current = parent;
        }
        vertices.reverse();
        Some(vertices)
    }
}

/// Runs BFS from `source` and returns its shortest-path tree.
///
/// Neighbors are expanded in the order [`GraphTraversal::outgoing_edges`]
/// lists them; a vertex keeps the first edge that discovers it and is never
/// revisited.
///
/// # Errors
///
/// Returns `Error::VertexNotFound` if `source` is not in the graph.
///
/// # Example
///
/// ```rust
/// use graphweave_core::algorithms::shortest_path::bfs_shortest_paths;
/// use graphweave_core::graph::SparseGraph;
///
/// let mut graph: SparseGraph<u32, u32> = SparseGraph::new();
/// graph.add_directed_edge(1, 0, 1)?;
/// graph.add_directed_edge(2, 1, 2)?;
///
/// let tree = bfs_shortest_paths(&graph, &0)?;
/// assert_eq!(tree.distance(&2), Some(2));
/// assert_eq!(tree.path_to(&2), Some(vec![1, 2]));
/// # Ok::<(), graphweave_core::Error>(())
/// ```
pub fn bfs_shortest_paths<G: GraphTraversal>(
    graph: &G,
    source: &G::Vertex,
) -> Result<ShortestPathTree<G::Vertex, G::Edge>> {
    if !graph.has_vertex(source) {
        return Err(Error::vertex_not_found(source));
    }

    let mut distances = FxHashMap::default();
    let mut parents = FxHashMap::default();
    let mut queue = VecDeque::new();

    distances.insert(source.clone(), 0usize);
    queue.push_back((source.clone(), 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        for (edge, next) in graph.outgoing_edges(&current)? {
            if distances.contains_key(next) {
                continue;
            }
            distances.insert(next.clone(), depth + 1);
            parents.insert(next.clone(), (edge.clone(), current.clone()));
            queue.push_back((next.clone(), depth + 1));
        }
    }

    Ok(ShortestPathTree {
        source: source.clone(),
        distances,
        parents,
    })
}

/// Shortest-path queries with a per-source cache of BFS trees.
///
/// Holds a shared borrow of the graph, so the graph cannot be mutated while
/// cached trees exist.
pub struct UnweightedShortestPath<'g, G: GraphTraversal> {
    graph: &'g G,
    trees: FxHashMap<G::Vertex, ShortestPathTree<G::Vertex, G::Edge>>,
}

impl<'g, G: GraphTraversal> UnweightedShortestPath<'g, G> {
    /// Creates a query object over `graph`.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            trees: FxHashMap::default(),
        }
    }

    /// Returns the (cached) tree rooted at `source`.
    pub fn tree(&mut self, source: &G::Vertex) -> Result<&ShortestPathTree<G::Vertex, G::Edge>> {
        if !self.trees.contains_key(source) {
            let tree = bfs_shortest_paths(self.graph, source)?;
            self.trees.insert(source.clone(), tree);
        }
        self.trees
            .get(source)
            .ok_or_else(|| Error::vertex_not_found(source))
    }

    /// Returns the hop count from `from` to `to`, `None` if unreachable.
    ///
    /// # Errors
    ///
    /// Returns `Error::VertexNotFound` if either vertex is unknown.
    pub fn distance(&mut self, from: &G::Vertex, to: &G::Vertex) -> Result<Option<usize>> {
        if !self.graph.has_vertex(to) {
            return Err(Error::vertex_not_found(to));
        }
        Ok(self.tree(from)?.distance(to))
    }

    /// Returns the distance map of `from`.
    pub fn distance_map(&mut self, from: &G::Vertex) -> Result<&FxHashMap<G::Vertex, usize>> {
        Ok(self.tree(from)?.distances())
    }

    /// Returns the tree edge by which `to` is reached from `from`.
    pub fn incoming_edge(&mut self, from: &G::Vertex, to: &G::Vertex) -> Result<Option<&G::Edge>> {
        if !self.graph.has_vertex(to) {
            return Err(Error::vertex_not_found(to));
        }
        Ok(self.tree(from)?.incoming_edge(to))
    }

    /// Returns the number of cached trees.
    #[must_use]
    pub fn cached_sources(&self) -> usize {
        self.trees.len()
    }

    /// Drops every cached tree.
    pub fn reset(&mut self) {
        self.trees.clear();
    }

    /// Drops the cached tree of one source.
    pub fn reset_source(&mut self, source: &G::Vertex) {
        self.trees.remove(source);
    }
}
