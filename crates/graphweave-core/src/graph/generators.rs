//! Random graph generators.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{Error, Result};

use super::sparse::SparseGraph;
use super::types::{EdgeId, EdgeType, VertexId};

/// Grows a scale-free graph by preferential attachment (Barabási–Albert).
///
/// Starts from `init_vertices` isolated vertices. Each evolution step adds
/// one vertex and connects it to `edges_per_step` distinct existing
/// vertices, each picked with probability proportional to `degree + 1`.
/// The RNG is seeded, so the same parameters and factories always produce
/// the same graph.
///
/// # Example
///
/// ```rust
/// use graphweave_core::graph::BarabasiAlbertGenerator;
///
/// let mut next_v = 0u32;
/// let mut next_e = 0u32;
/// let mut generator = BarabasiAlbertGenerator::new(
///     move || { next_v += 1; next_v },
///     move || { next_e += 1; next_e },
///     3,
///     2,
///     42,
/// )?;
/// generator.evolve_graph(10)?;
/// assert_eq!(generator.graph().vertex_count(), 13);
/// assert_eq!(generator.graph().edge_count(), 20);
/// # Ok::<(), graphweave_core::Error>(())
/// ```
pub struct BarabasiAlbertGenerator<V, E> {
    graph: SparseGraph<V, E>,
    vertex_factory: Box<dyn FnMut() -> V>,
    edge_factory: Box<dyn FnMut() -> E>,
    edges_per_step: usize,
    edge_type: EdgeType,
    rng: StdRng,
}

impl<V: VertexId, E: EdgeId> BarabasiAlbertGenerator<V, E> {
    /// Creates a generator seeded with `init_vertices` isolated vertices.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `edges_per_step` is zero or
    /// exceeds `init_vertices`, or if the vertex factory repeats an id.
    pub fn new(
        vertex_factory: impl FnMut() -> V + 'static,
        edge_factory: impl FnMut() -> E + 'static,
        init_vertices: usize,
        edges_per_step: usize,
        seed: u64,
    ) -> Result<Self> {
        if edges_per_step == 0 {
            return Err(Error::InvalidParameter(
                "edges_per_step must be at least 1".to_string(),
            ));
        }
        if edges_per_step > init_vertices {
            return Err(Error::InvalidParameter(format!(
                "edges_per_step ({edges_per_step}) cannot exceed init_vertices ({init_vertices})"
            )));
        }

        let mut generator = Self {
            graph: SparseGraph::with_capacity(init_vertices, 0),
            vertex_factory: Box::new(vertex_factory),
            edge_factory: Box::new(edge_factory),
            edges_per_step,
            edge_type: EdgeType::Undirected,
            rng: StdRng::seed_from_u64(seed),
        };
        for _ in 0..init_vertices {
            generator.fresh_vertex()?;
        }
        Ok(generator)
    }

    /// Sets the directedness of generated edges (undirected by default).
    /// Directed edges point from the new vertex to the chosen target.
    #[must_use]
    pub fn with_edge_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = edge_type;
        self
    }

    /// Runs `steps` evolution steps.
    ///
    /// A step that fails adds nothing; steps completed before it are kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if a factory repeats an id.
    pub fn evolve_graph(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            self.evolve_step()?;
        }
        Ok(())
    }

    /// Returns the graph grown so far.
    #[must_use]
    pub fn graph(&self) -> &SparseGraph<V, E> {
        &self.graph
    }

    /// Consumes the generator, returning its graph.
    #[must_use]
    pub fn into_graph(self) -> SparseGraph<V, E> {
        self.graph
    }

    fn evolve_step(&mut self) -> Result<()> {
        let mut candidates: Vec<(V, usize)> = self
            .graph
            .vertices()
            .map(|v| (v.clone(), self.graph.degree(v).map_or(1, |d| d + 1)))
            .collect();

        let mut targets = Vec::with_capacity(self.edges_per_step);
        while targets.len() < self.edges_per_step && !candidates.is_empty() {
            let dist = WeightedIndex::new(candidates.iter().map(|(_, w)| *w))
                .map_err(|e| Error::InvalidParameter(format!("attachment weights: {e}")))?;
            let picked = dist.sample(&mut self.rng);
            targets.push(candidates.swap_remove(picked).0);
        }

        // Draw and check every edge id before touching the graph, so a
        // failed step leaves it as it was.
        let mut ids: Vec<E> = Vec::with_capacity(targets.len());
        for _ in 0..targets.len() {
            let id = (self.edge_factory)();
            if self.graph.contains_edge(&id) || ids.contains(&id) {
                return Err(Error::InvalidParameter(format!(
                    "edge factory produced duplicate id {id:?}"
                )));
            }
            ids.push(id);
        }

        let source = self.fresh_vertex()?;
        for (id, target) in ids.into_iter().zip(targets) {
            self.graph
                .add_edge(id, source.clone(), target, self.edge_type)?;
        }
        Ok(())
    }

    fn fresh_vertex(&mut self) -> Result<V> {
        let vertex = (self.vertex_factory)();
        if !self.graph.add_vertex(vertex.clone()) {
            return Err(Error::InvalidParameter(format!(
                "vertex factory produced duplicate id {vertex:?}"
            )));
        }
        Ok(vertex)
    }
}
