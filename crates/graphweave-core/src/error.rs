//! Error types for graphweave-core.
//!
//! Every failure a caller can observe from the graph store or the scoring
//! algorithms is one of these variants. Identifiers are generic in the store,
//! so they are captured here through their `Debug` rendering.

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by graph storage, algorithms, and the relaxer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edge id was re-added with endpoints (or directedness) that differ
    /// from the ones it was first inserted with.
    #[error("Edge {edge} already connects {existing}; refusing to rebind it to {requested}")]
    StructuralViolation {
        /// Debug rendering of the edge id.
        edge: String,
        /// Endpoints currently stored for the edge.
        existing: String,
        /// Endpoints the caller attempted to insert.
        requested: String,
    },

    /// The referenced vertex is not part of the graph.
    #[error("Vertex not found: {0}")]
    VertexNotFound(String),

    /// The referenced edge is not part of the graph.
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// A numeric parameter is outside its allowed domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller broke the single-stepper contract (e.g. a synchronous
    /// burst while a background run owns the process).
    #[error("Concurrency misuse: {0}")]
    ConcurrencyMisuse(String),

    /// A driven process failed inside `step()`, or panicked in `step()` or
    /// `done()`, during a synchronous burst.
    #[error("Step failed: {0}")]
    StepFailed(String),
}

impl Error {
    /// Returns a stable error code for this variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StructuralViolation { .. } => "GRAPHWEAVE-001",
            Self::VertexNotFound(_) => "GRAPHWEAVE-002",
            Self::EdgeNotFound(_) => "GRAPHWEAVE-003",
            Self::InvalidParameter(_) => "GRAPHWEAVE-004",
            Self::ConcurrencyMisuse(_) => "GRAPHWEAVE-005",
            Self::StepFailed(_) => "GRAPHWEAVE-006",
        }
    }

    /// Returns true for the two lookup failures (unknown vertex or edge).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VertexNotFound(_) | Self::EdgeNotFound(_))
    }

    pub(crate) fn vertex_not_found<V: std::fmt::Debug>(vertex: &V) -> Self {
        Self::VertexNotFound(format!("{vertex:?}"))
    }

    pub(crate) fn edge_not_found<E: std::fmt::Debug>(edge: &E) -> Self {
        Self::EdgeNotFound(format!("{edge:?}"))
    }
}
