//! Graph algorithms over any [`GraphTraversal`](crate::graph::GraphTraversal).
//!
//! - [`pagerank`]: PageRank with priors and edge weights
//! - [`shortest_path`]: unweighted BFS distances and shortest-path trees

pub mod pagerank;
pub mod shortest_path;

#[cfg(test)]
mod pagerank_tests;

pub use pagerank::{page_rank, PageRankConfig, PageRankResult, PageRankWithPriors};
pub use shortest_path::{bfs_shortest_paths, ShortestPathTree, UnweightedShortestPath};
