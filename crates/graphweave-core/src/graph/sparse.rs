//! Sparse adjacency-indexed multigraph with mixed directed/undirected edges.
//!
//! The edge map is the source of truth; the per-vertex incoming/outgoing
//! sets are its exact inverse. Every mutation below keeps the two in step,
//! and a rejected mutation leaves both untouched.

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

use super::types::{Adjacency, EdgeId, EdgeRecord, EdgeType, Endpoints, FxIndexMap, FxIndexSet, VertexId};

/// In-memory sparse graph with bidirectional indexing.
///
/// Provides O(1) amortized insertion and removal of single vertices and
/// edges, and O(degree) neighborhood queries and vertex removal.
///
/// An undirected edge is recorded once, as outgoing of its first endpoint
/// and incoming of its second. [`SparseGraph::in_edges`] and
/// [`SparseGraph::out_edges`] expose that raw record; the neighborhood
/// queries ([`SparseGraph::successors`], [`SparseGraph::predecessors`],
/// [`SparseGraph::find_edge`]) treat undirected edges as usable from either
/// side.
///
/// Iteration order of every returned collection is unspecified.
///
/// The store is not internally synchronized. Callers that share it with a
/// running algorithm or relaxer must serialize mutations themselves.
///
/// # Example
///
/// ```rust
/// use graphweave_core::graph::{EdgeType, SparseGraph};
///
/// let mut graph: SparseGraph<&str, u32> = SparseGraph::new();
/// graph.add_edge(1, "a", "b", EdgeType::Directed)?;
/// graph.add_edge(2, "b", "c", EdgeType::Undirected)?;
///
/// assert_eq!(graph.vertex_count(), 3);
/// assert!(graph.successors(&"c")?.contains(&"b"));
/// assert!(graph.add_edge(1, "a", "c", EdgeType::Directed).is_err());
/// # Ok::<(), graphweave_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SparseGraph<V, E> {
    /// Vertex -> {incoming, outgoing} edge ids.
    vertices: FxIndexMap<V, Adjacency<E>>,
    /// Edge id -> endpoints and directedness.
    edges: FxIndexMap<E, EdgeRecord<V>>,
}

impl<V, E> Default for SparseGraph<V, E> {
    fn default() -> Self {
        Self {
            vertices: FxIndexMap::default(),
            edges: FxIndexMap::default(),
        }
    }
}

impl<V: VertexId, E: EdgeId> SparseGraph<V, E> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(expected_vertices: usize, expected_edges: usize) -> Self {
        Self {
            vertices: FxIndexMap::with_capacity_and_hasher(expected_vertices, Default::default()),
            edges: FxIndexMap::with_capacity_and_hasher(expected_edges, Default::default()),
        }
    }

    // ── Vertex CRUD ────────────────────────────────────────────────────

    /// Adds a vertex. Returns false (and does nothing) if it already exists.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex, Adjacency::default());
        true
    }

    /// Removes a vertex and every edge incident to it.
    ///
    /// Returns false if the vertex was not present.
    pub fn remove_vertex(&mut self, vertex: &V) -> bool {
        let Some(adjacency) = self.vertices.get(vertex) else {
            return false;
        };

        // Snapshot first: remove_edge mutates these very sets.
        let incident: Vec<E> = adjacency
            .incoming
            .iter()
            .chain(adjacency.outgoing.iter())
            .cloned()
            .collect();

        let mut removed = 0usize;
        for edge in &incident {
            if self.remove_edge(edge) {
                removed += 1;
            }
        }
        self.vertices.swap_remove(vertex);

        tracing::trace!(vertex = ?vertex, removed_edges = removed, "Removed vertex");
        true
    }

    /// Returns true if the vertex exists.
    #[must_use]
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains_key(vertex)
    }

    /// Returns the total number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.vertices.keys()
    }

    // ── Edge CRUD ──────────────────────────────────────────────────────

    /// Adds an edge from `source` to `dest`, creating missing endpoints.
    ///
    /// Returns `Ok(true)` if the edge was inserted and `Ok(false)` if the
    /// exact same edge (endpoints and directedness) was already present.
    ///
    /// # Errors
    ///
    /// Returns `Error::StructuralViolation` if `id` already names an edge
    /// with different endpoints or directedness. The graph is unchanged.
    pub fn add_edge(&mut self, id: E, source: V, dest: V, edge_type: EdgeType) -> Result<bool> {
        if let Some(existing) = self.edges.get(&id) {
            let same = existing.edge_type() == edge_type
                && existing.endpoints().source() == &source
                && existing.endpoints().dest() == &dest;
            if same {
                return Ok(false);
            }
            return Err(Error::StructuralViolation {
                edge: format!("{id:?}"),
                existing: describe(existing.endpoints(), existing.edge_type()),
                requested: describe(&Endpoints::new(source, dest), edge_type),
            });
        }

        self.vertices
            .entry(source.clone())
            .or_default()
            .outgoing
            .insert(id.clone());
        self.vertices
            .entry(dest.clone())
            .or_default()
            .incoming
            .insert(id.clone());
        self.edges
            .insert(id, EdgeRecord::new(Endpoints::new(source, dest), edge_type));
        Ok(true)
    }

    /// Adds a directed edge. See [`SparseGraph::add_edge`].
    pub fn add_directed_edge(&mut self, id: E, source: V, dest: V) -> Result<bool> {
        self.add_edge(id, source, dest, EdgeType::Directed)
    }

    /// Adds an undirected edge. See [`SparseGraph::add_edge`].
    pub fn add_undirected_edge(&mut self, id: E, first: V, second: V) -> Result<bool> {
        self.add_edge(id, first, second, EdgeType::Undirected)
    }

    /// Removes an edge from the edge map and both adjacency sets.
    ///
    /// Returns false if the edge was not present.
    pub fn remove_edge(&mut self, id: &E) -> bool {
        let Some(record) = self.edges.swap_remove(id) else {
            return false;
        };
        let endpoints = record.endpoints();
        if let Some(adjacency) = self.vertices.get_mut(endpoints.source()) {
            adjacency.outgoing.swap_remove(id);
        }
        if let Some(adjacency) = self.vertices.get_mut(endpoints.dest()) {
            adjacency.incoming.swap_remove(id);
        }
        true
    }

    /// Returns true if the edge exists.
    #[must_use]
    pub fn contains_edge(&self, id: &E) -> bool {
        self.edges.contains_key(id)
    }

    /// Returns the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns all edge ids.
    pub fn edges(&self) -> impl Iterator<Item = &E> + '_ {
        self.edges.keys()
    }

    /// Returns all edges with their stored record.
    pub fn edge_entries(&self) -> impl Iterator<Item = (&E, &EdgeRecord<V>)> + '_ {
        self.edges.iter()
    }

    /// Gets the stored record of an edge, if present.
    #[must_use]
    pub fn edge(&self, id: &E) -> Option<&EdgeRecord<V>> {
        self.edges.get(id)
    }

    /// Returns true if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Clears all vertices and edges.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    // ── Edge lookups ───────────────────────────────────────────────────

    /// Returns the endpoint pair of an edge.
    pub fn endpoints(&self, id: &E) -> Result<&Endpoints<V>> {
        self.record(id).map(EdgeRecord::endpoints)
    }

    /// Returns the first endpoint of an edge.
    pub fn source(&self, id: &E) -> Result<&V> {
        self.endpoints(id).map(Endpoints::source)
    }

    /// Returns the second endpoint of an edge.
    pub fn dest(&self, id: &E) -> Result<&V> {
        self.endpoints(id).map(Endpoints::dest)
    }

    /// Returns the directedness of an edge.
    pub fn edge_type(&self, id: &E) -> Result<EdgeType> {
        self.record(id).map(EdgeRecord::edge_type)
    }

    /// Returns true if the edge is directed.
    pub fn is_directed(&self, id: &E) -> Result<bool> {
        self.edge_type(id).map(EdgeType::is_directed)
    }

    /// Returns true if `vertex` is the first endpoint of the edge.
    pub fn is_source(&self, vertex: &V, id: &E) -> Result<bool> {
        Ok(self.source(id)? == vertex)
    }

    /// Returns true if `vertex` is the second endpoint of the edge.
    pub fn is_dest(&self, vertex: &V, id: &E) -> Result<bool> {
        Ok(self.dest(id)? == vertex)
    }

    /// Returns the endpoint opposite to `vertex`, or `None` if `vertex` is
    /// not incident to the edge.
    pub fn opposite(&self, vertex: &V, id: &E) -> Result<Option<&V>> {
        Ok(self.endpoints(id)?.opposite(vertex))
    }

    // ── Neighborhood queries ───────────────────────────────────────────

    /// Returns the raw incoming adjacency set of a vertex.
    pub fn in_edges(&self, vertex: &V) -> Result<&FxIndexSet<E>> {
        self.adjacency(vertex).map(|adj| &adj.incoming)
    }

    /// Returns the raw outgoing adjacency set of a vertex.
    pub fn out_edges(&self, vertex: &V) -> Result<&FxIndexSet<E>> {
        self.adjacency(vertex).map(|adj| &adj.outgoing)
    }

    /// Returns every edge incident to a vertex, regardless of direction.
    pub fn incident_edges(&self, vertex: &V) -> Result<FxHashSet<&E>> {
        let adj = self.adjacency(vertex)?;
        Ok(adj.incoming.iter().chain(adj.outgoing.iter()).collect())
    }

    /// Returns vertices that can reach `vertex` over a single edge.
    pub fn predecessors(&self, vertex: &V) -> Result<FxHashSet<&V>> {
        let adj = self.adjacency(vertex)?;
        let mut preds = FxHashSet::default();
        for record in adj.incoming.iter().filter_map(|e| self.edges.get(e)) {
            preds.insert(record.endpoints().source());
        }
        for record in adj.outgoing.iter().filter_map(|e| self.edges.get(e)) {
            if !record.edge_type().is_directed() {
                preds.insert(record.endpoints().dest());
            }
        }
        Ok(preds)
    }

    /// Returns vertices reachable from `vertex` over a single edge.
    pub fn successors(&self, vertex: &V) -> Result<FxHashSet<&V>> {
        Ok(self
            .traversable_edges(vertex)?
            .into_iter()
            .map(|(_, next)| next)
            .collect())
    }

    /// Returns every vertex sharing an edge with `vertex`.
    pub fn neighbors(&self, vertex: &V) -> Result<FxHashSet<&V>> {
        let mut out = self.predecessors(vertex)?;
        out.extend(self.successors(vertex)?);
        Ok(out)
    }

    /// Returns the number of raw incoming edges.
    pub fn in_degree(&self, vertex: &V) -> Result<usize> {
        self.in_edges(vertex).map(FxIndexSet::len)
    }

    /// Returns the number of raw outgoing edges.
    pub fn out_degree(&self, vertex: &V) -> Result<usize> {
        self.out_edges(vertex).map(FxIndexSet::len)
    }

    /// Returns the number of distinct incident edges.
    pub fn degree(&self, vertex: &V) -> Result<usize> {
        self.incident_edges(vertex).map(|edges| edges.len())
    }

    /// Finds an edge leading from `from` to `to`.
    ///
    /// Directed edges match only in their own direction; undirected edges
    /// match either way. Which edge is returned among parallel candidates is
    /// unspecified.
    pub fn find_edge(&self, from: &V, to: &V) -> Result<Option<&E>> {
        if !self.contains_vertex(to) {
            return Err(Error::vertex_not_found(to));
        }
        Ok(self
            .traversable_edges(from)?
            .into_iter()
            .find(|(_, next)| *next == to)
            .map(|(edge, _)| edge))
    }

    /// Edges usable to leave `vertex`, paired with the vertex they lead to.
    ///
    /// Outgoing edges come first in adjacency order, then undirected edges
    /// recorded as incoming. An undirected self-loop is listed once.
    pub fn traversable_edges(&self, vertex: &V) -> Result<Vec<(&E, &V)>> {
        let adj = self.adjacency(vertex)?;
        let mut out = Vec::with_capacity(adj.outgoing.len() + adj.incoming.len());
        for (edge, record) in adj
            .outgoing
            .iter()
            .filter_map(|e| self.edges.get_key_value(e))
        {
            out.push((edge, record.endpoints().dest()));
        }
        for (edge, record) in adj
            .incoming
            .iter()
            .filter_map(|e| self.edges.get_key_value(e))
        {
            if !record.edge_type().is_directed() && !record.endpoints().is_self_loop() {
                out.push((edge, record.endpoints().source()));
            }
        }
        Ok(out)
    }

    fn record(&self, id: &E) -> Result<&EdgeRecord<V>> {
        self.edges.get(id).ok_or_else(|| Error::edge_not_found(id))
    }

    fn adjacency(&self, vertex: &V) -> Result<&Adjacency<E>> {
        self.vertices
            .get(vertex)
            .ok_or_else(|| Error::vertex_not_found(vertex))
    }
}

fn describe<V: std::fmt::Debug>(endpoints: &Endpoints<V>, edge_type: EdgeType) -> String {
    let arrow = match edge_type {
        EdgeType::Directed => "->",
        EdgeType::Undirected => "--",
    };
    format!("{:?} {arrow} {:?}", endpoints.source(), endpoints.dest())
}
