//! Enumeration snapshot of a graph, the boundary used by serializers.
//!
//! A snapshot lists every vertex and every edge with its endpoints and
//! directedness. Rebuilding from it goes through the normal add operations,
//! so a snapshot that violates an invariant is rejected rather than loaded.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::sparse::SparseGraph;
use super::types::{EdgeId, EdgeType, VertexId};

/// One edge of a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry<V, E> {
    /// Edge id.
    pub id: E,
    /// First endpoint.
    pub source: V,
    /// Second endpoint.
    pub dest: V,
    /// Directedness.
    #[serde(default)]
    pub edge_type: EdgeType,
}

/// Format-neutral enumeration of a whole graph.
///
/// # Example
///
/// ```rust
/// use graphweave_core::graph::SparseGraph;
///
/// let mut graph: SparseGraph<u32, u32> = SparseGraph::new();
/// graph.add_directed_edge(10, 1, 2)?;
/// graph.add_vertex(3);
///
/// let rebuilt = SparseGraph::from_snapshot(graph.snapshot())?;
/// assert_eq!(rebuilt.vertex_count(), 3);
/// assert!(rebuilt.is_directed(&10)?);
/// # Ok::<(), graphweave_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot<V, E> {
    /// Every vertex, including isolated ones.
    pub vertices: Vec<V>,
    /// Every edge.
    pub edges: Vec<EdgeEntry<V, E>>,
}

impl<V, E> Default for GraphSnapshot<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V: VertexId, E: EdgeId> SparseGraph<V, E> {
    /// Enumerates the graph into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot<V, E> {
        GraphSnapshot {
            vertices: self.vertices().cloned().collect(),
            edges: self
                .edge_entries()
                .map(|(id, record)| EdgeEntry {
                    id: id.clone(),
                    source: record.endpoints().source().clone(),
                    dest: record.endpoints().dest().clone(),
                    edge_type: record.edge_type(),
                })
                .collect(),
        }
    }

    /// Rebuilds a graph from a snapshot using the add operations.
    ///
    /// # Errors
    ///
    /// Returns `Error::StructuralViolation` if the snapshot lists the same
    /// edge id twice with different endpoints or directedness.
    pub fn from_snapshot(snapshot: GraphSnapshot<V, E>) -> Result<Self> {
        let mut graph = Self::with_capacity(snapshot.vertices.len(), snapshot.edges.len());
        for vertex in snapshot.vertices {
            graph.add_vertex(vertex);
        }
        for entry in snapshot.edges {
            graph.add_edge(entry.id, entry.source, entry.dest, entry.edge_type)?;
        }
        Ok(graph)
    }
}
