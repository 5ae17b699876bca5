//! Identifier bounds and per-edge records shared by the store and algorithms.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Insertion-ordered hash map keyed with the Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Insertion-ordered hash set keyed with the Fx hasher.
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Bound for vertex identifiers.
///
/// Vertices carry no structure of their own; any hashable, clonable value
/// can name one. Implemented automatically.
pub trait VertexId: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> VertexId for T {}

/// Bound for edge identifiers. Implemented automatically.
pub trait EdgeId: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> EdgeId for T {}

/// Directedness of a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Traversable from source to dest only.
    #[default]
    Directed,
    /// Traversable in both directions.
    Undirected,
}

impl EdgeType {
    /// Returns true for [`EdgeType::Directed`].
    #[must_use]
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Directed)
    }
}

/// Ordered endpoint pair of an edge.
///
/// For undirected edges the order is only the insertion convention; it still
/// decides which adjacency set (outgoing of `source`, incoming of `dest`)
/// records the edge.
///
/// # Example
///
/// ```rust
/// use graphweave_core::graph::Endpoints;
///
/// let pair = Endpoints::new("a", "b");
/// assert_eq!(pair.source(), &"a");
/// assert_eq!(pair.opposite(&"b"), Some(&"a"));
/// assert_eq!(pair.opposite(&"z"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoints<V> {
    source: V,
    dest: V,
}

impl<V> Endpoints<V> {
    /// Creates an endpoint pair.
    #[must_use]
    pub fn new(source: V, dest: V) -> Self {
        Self { source, dest }
    }

    /// Returns the first endpoint.
    #[must_use]
    pub fn source(&self) -> &V {
        &self.source
    }

    /// Returns the second endpoint.
    #[must_use]
    pub fn dest(&self) -> &V {
        &self.dest
    }

    /// Consumes the pair, returning `(source, dest)`.
    #[must_use]
    pub fn into_inner(self) -> (V, V) {
        (self.source, self.dest)
    }
}

impl<V: PartialEq> Endpoints<V> {
    /// Returns the endpoint on the other side of `vertex`, or `None` if
    /// `vertex` is not an endpoint. A self-loop returns the vertex itself.
    #[must_use]
    pub fn opposite(&self, vertex: &V) -> Option<&V> {
        if &self.source == vertex {
            Some(&self.dest)
        } else if &self.dest == vertex {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Returns true when both endpoints are the same vertex.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.dest
    }
}

/// Stored form of an edge: its endpoints tagged with its directedness.
///
/// Directedness lives next to the endpoints instead of in a side set, so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord<V> {
    endpoints: Endpoints<V>,
    edge_type: EdgeType,
}

impl<V> EdgeRecord<V> {
    /// Creates a record.
    #[must_use]
    pub fn new(endpoints: Endpoints<V>, edge_type: EdgeType) -> Self {
        Self {
            endpoints,
            edge_type,
        }
    }

    /// Returns the endpoint pair.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints<V> {
        &self.endpoints
    }

    /// Returns the directedness tag.
    #[must_use]
    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }
}

/// Per-vertex adjacency: the inverse index of the edge map.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency<E> {
    pub(crate) incoming: FxIndexSet<E>,
    pub(crate) outgoing: FxIndexSet<E>,
}

impl<E> Default for Adjacency<E> {
    fn default() -> Self {
        Self {
            incoming: FxIndexSet::default(),
            outgoing: FxIndexSet::default(),
        }
    }
}
