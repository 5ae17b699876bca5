//! Read-only traversal interface consumed by the graph algorithms.
//!
//! Algorithms are written against [`GraphTraversal`] rather than a concrete
//! store, so any graph that can enumerate its vertices and the edges leaving
//! a vertex can be scored or searched without reimplementation.

use crate::error::Result;

use super::sparse::SparseGraph;
use super::types::{EdgeId, VertexId};

/// Trait for graph traversal — any graph store can implement this.
pub trait GraphTraversal {
    /// Vertex identifier type.
    type Vertex: VertexId;
    /// Edge identifier type.
    type Edge: EdgeId;

    /// Returns true if the vertex is part of the graph.
    fn has_vertex(&self, vertex: &Self::Vertex) -> bool;

    /// Returns every vertex of the graph.
    fn vertex_list(&self) -> Vec<&Self::Vertex>;

    /// Returns the edges that can be followed out of `vertex` as
    /// `(edge, next_vertex)` pairs. Undirected edges count from both ends.
    ///
    /// # Errors
    ///
    /// Returns `Error::VertexNotFound` if the vertex is unknown.
    fn outgoing_edges(&self, vertex: &Self::Vertex) -> Result<Vec<(&Self::Edge, &Self::Vertex)>>;
}

impl<V: VertexId, E: EdgeId> GraphTraversal for SparseGraph<V, E> {
    type Vertex = V;
    type Edge = E;

    fn has_vertex(&self, vertex: &V) -> bool {
        self.contains_vertex(vertex)
    }

    fn vertex_list(&self) -> Vec<&V> {
        self.vertices().collect()
    }

    fn outgoing_edges(&self, vertex: &V) -> Result<Vec<(&E, &V)>> {
        self.traversable_edges(vertex)
    }
}
