//! PageRank with priors.
//!
//! Scores vertices by power iteration, blending teleportation to a prior
//! distribution with propagation along weighted edges.
//!
//! # Formula
//!
//! ```text
//! score'(v) = α·prior(v) + (1 − α)·( Σ_{u → v} share(u → v)·score(u) + sink·prior(v) )
//! ```
//!
//! Where:
//! - `α` is the teleport probability (0 = pure link following)
//! - `share(u → v)` is `weight(u → v) / Σ weight(u → ·)` over the edges leaving `u`
//! - `sink` is the total score held by vertices whose outgoing weight is zero;
//!   that mass is handed back according to the priors instead of vanishing
//!
//! Undirected edges leave both of their endpoints. Iteration stops when the
//! sum of absolute score changes falls below the tolerance or the iteration
//! cap is reached. When the priors sum to 1 and weights are non-negative the
//! scores keep summing to 1.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::GraphTraversal;

/// Configuration for PageRank iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Teleport probability α in [0, 1].
    /// Default: 0.15
    pub alpha: f64,

    /// Maximum number of iterations before stopping.
    /// Default: 100
    pub max_iterations: usize,

    /// Convergence tolerance on the sum of absolute per-vertex changes.
    /// Default: 1e-6
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: 0.15,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl PageRankConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the teleport probability.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the maximum number of iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks parameter domains.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `alpha` is outside [0, 1] or the
    /// tolerance is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidParameter(format!(
                "alpha must lie in [0, 1], got {}",
                self.alpha
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Result of a PageRank run.
#[derive(Debug, Clone)]
pub struct PageRankResult<V> {
    /// Score of every vertex.
    pub scores: FxHashMap<V, f64>,

    /// Number of iterations performed.
    pub iterations: usize,

    /// Whether the run stopped on tolerance rather than on the cap.
    pub converged: bool,

    /// Sum of absolute score changes in the last iteration.
    pub final_delta: f64,
}

impl<V: Eq + std::hash::Hash + Clone> PageRankResult<V> {
    /// Get the score of a vertex.
    #[must_use]
    pub fn score(&self, vertex: &V) -> Option<f64> {
        self.scores.get(vertex).copied()
    }

    /// Get vertices sorted by score (descending).
    #[must_use]
    pub fn sorted(&self) -> Vec<(V, f64)> {
        let mut pairs: Vec<_> = self
            .scores
            .iter()
            .map(|(v, &score)| (v.clone(), score))
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    /// Get the top N vertices by score.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<(V, f64)> {
        self.sorted().into_iter().take(n).collect()
    }

    /// Sum of all scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }
}

type EdgeWeightFn<'a, E> = Box<dyn Fn(&E) -> f64 + 'a>;
type PriorFn<'a, V> = Box<dyn Fn(&V) -> f64 + 'a>;

/// PageRank with pluggable edge weights and vertex priors.
///
/// Absent weights mean 1 per edge; absent priors mean `1/n` per vertex.
///
/// # Example
///
/// ```rust
/// use graphweave_core::algorithms::pagerank::{PageRankConfig, PageRankWithPriors};
/// use graphweave_core::graph::SparseGraph;
///
/// let mut graph: SparseGraph<&str, u32> = SparseGraph::new();
/// graph.add_directed_edge(1, "a", "b")?;
/// graph.add_directed_edge(2, "b", "a")?;
///
/// let result = PageRankWithPriors::new(&graph, PageRankConfig::default())
///     .with_priors(|v: &&str| if *v == "a" { 1.0 } else { 0.0 })
///     .evaluate()?;
/// assert!((result.total() - 1.0).abs() < 1e-6);
/// assert!(result.score(&"a").unwrap() > result.score(&"b").unwrap());
/// # Ok::<(), graphweave_core::Error>(())
/// ```
pub struct PageRankWithPriors<'a, G: GraphTraversal> {
    graph: &'a G,
    config: PageRankConfig,
    edge_weights: Option<EdgeWeightFn<'a, G::Edge>>,
    priors: Option<PriorFn<'a, G::Vertex>>,
}

impl<'a, G: GraphTraversal> PageRankWithPriors<'a, G> {
    /// Creates a scorer with uniform weights and priors.
    #[must_use]
    pub fn new(graph: &'a G, config: PageRankConfig) -> Self {
        Self {
            graph,
            config,
            edge_weights: None,
            priors: None,
        }
    }

    /// Sets the edge weight function. Weights must be non-negative.
    #[must_use]
    pub fn with_edge_weights(mut self, weights: impl Fn(&G::Edge) -> f64 + 'a) -> Self {
        self.edge_weights = Some(Box::new(weights));
        self
    }

    /// Sets the prior function. Priors must be non-negative.
    #[must_use]
    pub fn with_priors(mut self, priors: impl Fn(&G::Vertex) -> f64 + 'a) -> Self {
        self.priors = Some(Box::new(priors));
        self
    }

    /// Runs the iteration to convergence or to the iteration cap.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for an out-of-range configuration
    /// or a negative (or non-finite) weight or prior.
    pub fn evaluate(&self) -> Result<PageRankResult<G::Vertex>> {
        self.config.validate()?;

        let vertices = self.graph.vertex_list();
        let n = vertices.len();
        if n == 0 {
            return Ok(PageRankResult {
                scores: FxHashMap::default(),
                iterations: 0,
                converged: true,
                final_delta: 0.0,
            });
        }

        let index: FxHashMap<&G::Vertex, usize> =
            vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let priors = self.prior_vector(&vertices)?;
        let (shares, is_sink) = self.transition_shares(&vertices, &index)?;

        let alpha = self.config.alpha;
        let mut scores = priors.clone();
        let mut next = vec![0.0_f64; n];
        let mut iterations = 0usize;
        let mut delta = f64::INFINITY;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;
            next.iter_mut().for_each(|s| *s = 0.0);

            let mut sink_mass = 0.0;
            for (i, out) in shares.iter().enumerate() {
                if is_sink[i] {
                    sink_mass += scores[i];
                    continue;
                }
                for &(j, share) in out {
                    next[j] += share * scores[i];
                }
            }

            delta = 0.0;
            for i in 0..n {
                let flowed = next[i] + sink_mass * priors[i];
                next[i] = alpha * priors[i] + (1.0 - alpha) * flowed;
                delta += (next[i] - scores[i]).abs();
            }
            std::mem::swap(&mut scores, &mut next);

            if delta < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            tracing::debug!(iterations, delta, vertices = n, "PageRank converged");
        } else {
            tracing::warn!(
                iterations,
                delta,
                tolerance = self.config.tolerance,
                "PageRank stopped at the iteration cap without converging"
            );
        }

        Ok(PageRankResult {
            scores: vertices
                .into_iter()
                .cloned()
                .zip(scores)
                .collect(),
            iterations,
            converged,
            final_delta: if iterations == 0 { 0.0 } else { delta },
        })
    }

    fn prior_vector(&self, vertices: &[&G::Vertex]) -> Result<Vec<f64>> {
        #[allow(clippy::cast_precision_loss)]
        let uniform = 1.0 / vertices.len() as f64;
        vertices
            .iter()
            .map(|&v| {
                let prior = self.priors.as_ref().map_or(uniform, |f| f(v));
                if prior.is_finite() && prior >= 0.0 {
                    Ok(prior)
                } else {
                    Err(Error::InvalidParameter(format!(
                        "prior of vertex {v:?} must be non-negative, got {prior}"
                    )))
                }
            })
            .collect()
    }

    /// Per-vertex outgoing `(target index, weight share)` lists, plus a flag
    /// for vertices whose outgoing weight is zero.
    fn transition_shares(
        &self,
        vertices: &[&G::Vertex],
        index: &FxHashMap<&G::Vertex, usize>,
    ) -> Result<(Vec<Vec<(usize, f64)>>, Vec<bool>)> {
        let mut shares = Vec::with_capacity(vertices.len());
        let mut is_sink = Vec::with_capacity(vertices.len());

        for &vertex in vertices {
            let mut out = Vec::new();
            let mut total = 0.0;
            for (edge, next) in self.graph.outgoing_edges(vertex)? {
                let weight = self.edge_weights.as_ref().map_or(1.0, |f| f(edge));
                if !weight.is_finite() || weight < 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "weight of edge {edge:?} must be non-negative, got {weight}"
                    )));
                }
                if let Some(&j) = index.get(next) {
                    out.push((j, weight));
                    total += weight;
                }
            }
            if total > 0.0 {
                out.iter_mut().for_each(|(_, w)| *w /= total);
                is_sink.push(false);
            } else {
                out.clear();
                is_sink.push(true);
            }
            shares.push(out);
        }
        Ok((shares, is_sink))
    }
}

/// PageRank with uniform priors and unit edge weights.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `alpha` is outside [0, 1].
pub fn page_rank<G: GraphTraversal>(graph: &G, alpha: f64) -> Result<PageRankResult<G::Vertex>> {
    PageRankWithPriors::new(graph, PageRankConfig::default().with_alpha(alpha)).evaluate()
}
