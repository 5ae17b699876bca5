//! Vertex/edge predicates and predicate-induced subgraphs.

use crate::error::Result;

use super::sparse::SparseGraph;
use super::types::{EdgeId, VertexId};

/// Decides which vertices and edges of a graph are kept by a filter.
pub trait GraphPredicate<V, E> {
    /// Returns true to keep `vertex`.
    fn evaluate_vertex(&self, graph: &SparseGraph<V, E>, vertex: &V) -> bool;

    /// Returns true to keep `edge`. Only consulted when both of its
    /// endpoints were kept.
    fn evaluate_edge(&self, graph: &SparseGraph<V, E>, edge: &E) -> bool;
}

/// [`GraphPredicate`] built from a pair of closures.
pub struct FnPredicate<FV, FE> {
    vertex: FV,
    edge: FE,
}

impl<FV, FE> FnPredicate<FV, FE> {
    /// Wraps a vertex test and an edge test.
    #[must_use]
    pub fn new(vertex: FV, edge: FE) -> Self {
        Self { vertex, edge }
    }
}

impl<V, E, FV, FE> GraphPredicate<V, E> for FnPredicate<FV, FE>
where
    FV: Fn(&SparseGraph<V, E>, &V) -> bool,
    FE: Fn(&SparseGraph<V, E>, &E) -> bool,
{
    fn evaluate_vertex(&self, graph: &SparseGraph<V, E>, vertex: &V) -> bool {
        (self.vertex)(graph, vertex)
    }

    fn evaluate_edge(&self, graph: &SparseGraph<V, E>, edge: &E) -> bool {
        (self.edge)(graph, edge)
    }
}

impl<V: VertexId, E: EdgeId> SparseGraph<V, E> {
    /// Builds the subgraph of accepted vertices and of accepted edges whose
    /// endpoints were both accepted. `self` is left unchanged.
    pub fn filtered<P>(&self, predicate: &P) -> Result<Self>
    where
        P: GraphPredicate<V, E> + ?Sized,
    {
        let mut sub = Self::new();
        for vertex in self.vertices() {
            if predicate.evaluate_vertex(self, vertex) {
                sub.add_vertex(vertex.clone());
            }
        }
        for (id, record) in self.edge_entries() {
            let endpoints = record.endpoints();
            if sub.contains_vertex(endpoints.source())
                && sub.contains_vertex(endpoints.dest())
                && predicate.evaluate_edge(self, id)
            {
                sub.add_edge(
                    id.clone(),
                    endpoints.source().clone(),
                    endpoints.dest().clone(),
                    record.edge_type(),
                )?;
            }
        }
        Ok(sub)
    }
}
