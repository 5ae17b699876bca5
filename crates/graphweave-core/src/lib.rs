//! # `Graphweave` Core
//!
//! In-memory graph store and graph algorithms, with a background scheduler
//! for iterative processes.
//!
//! ## Features
//!
//! - **Mixed multigraph**: directed and undirected edges side by side, with
//!   O(1) edge insertion/removal and an always-consistent adjacency index
//! - **Shortest paths**: unweighted BFS trees with per-source caching
//! - **PageRank with priors**: pluggable edge weights and teleport priors
//! - **Relaxer**: pause/resume/stop control over a stepping worker thread
//! - **Layered config**: defaults, TOML file and `GRAPHWEAVE_*` environment
//!
//! ## Quick Start
//!
//! ```rust
//! use graphweave_core::algorithms::{page_rank, UnweightedShortestPath};
//! use graphweave_core::{EdgeType, SparseGraph};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph: SparseGraph<&str, u32> = SparseGraph::new();
//!     graph.add_edge(1, "home", "docs", EdgeType::Directed)?;
//!     graph.add_edge(2, "docs", "api", EdgeType::Directed)?;
//!     graph.add_edge(3, "api", "home", EdgeType::Undirected)?;
//!
//!     let mut paths = UnweightedShortestPath::new(&graph);
//!     assert_eq!(paths.distance(&"home", &"api")?, Some(1));
//!
//!     let ranks = page_rank(&graph, 0.15)?;
//!     assert!((ranks.total() - 1.0).abs() < 1e-6);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::float_cmp,
        clippy::cast_possible_truncation
    )
)]

pub mod algorithms;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod error;
pub mod graph;
pub mod relax;

pub use algorithms::{
    bfs_shortest_paths, page_rank, PageRankConfig, PageRankResult, PageRankWithPriors,
    ShortestPathTree, UnweightedShortestPath,
};
pub use config::{ConfigError, GraphweaveConfig, RelaxerConfig};
pub use error::{Error, Result};
pub use graph::{
    BarabasiAlbertGenerator, EdgeType, Endpoints, GraphPredicate, GraphSnapshot, GraphTraversal,
    SparseGraph,
};
pub use relax::{IterativeProcess, Relaxer, RelaxerState, RelaxerStatus};
