//! In-memory graph module.
//!
//! Provides the sparse multigraph store, its enumeration snapshot, predicate
//! filtering, a random generator, and the [`GraphTraversal`] interface the
//! algorithms are written against.
//!
//! # Example
//!
//! ```rust
//! use graphweave_core::graph::{EdgeType, SparseGraph};
//!
//! let mut graph: SparseGraph<u64, u64> = SparseGraph::new();
//! graph.add_vertex(1);
//! graph.add_edge(100, 1, 2, EdgeType::Directed).unwrap();
//! graph.add_edge(101, 2, 3, EdgeType::Undirected).unwrap();
//!
//! assert_eq!(graph.edge_count(), 2);
//! assert!(graph.remove_vertex(&2));
//! assert_eq!(graph.edge_count(), 0);
//! ```

pub mod generators;
mod predicate;
mod snapshot;
mod sparse;
pub mod traversal;
mod types;

#[cfg(test)]
mod predicate_tests;

pub use generators::BarabasiAlbertGenerator;
pub use predicate::{FnPredicate, GraphPredicate};
pub use snapshot::{EdgeEntry, GraphSnapshot};
pub use sparse::SparseGraph;
pub use traversal::GraphTraversal;
pub use types::{EdgeId, EdgeRecord, EdgeType, Endpoints, FxIndexMap, FxIndexSet, VertexId};
