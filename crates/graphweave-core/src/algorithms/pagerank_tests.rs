//! Tests for PageRank with priors.

use rustc_hash::FxHashMap;

use super::pagerank::{page_rank, PageRankConfig, PageRankWithPriors};
use crate::error::Error;
use crate::graph::{BarabasiAlbertGenerator, SparseGraph};

const EPSILON: f64 = 1e-3;

fn counter() -> impl FnMut() -> u32 {
    let mut next = 0_u32;
    move || {
        next += 1;
        next
    }
}

fn weighted_cycle() -> (SparseGraph<u32, u32>, FxHashMap<u32, f64>) {
    let mut graph = SparseGraph::new();
    let mut weights = FxHashMap::default();
    for (id, source, dest, weight) in [
        (0, 0, 1, 1.0),
        (1, 1, 2, 1.0),
        (2, 2, 3, 0.5),
        (3, 3, 1, 1.0),
        (4, 2, 1, 0.5),
    ] {
        graph.add_directed_edge(id, source, dest).unwrap();
        weights.insert(id, weight);
    }
    (graph, weights)
}

#[test]
fn test_weighted_ranking_without_teleport() {
    let (graph, weights) = weighted_cycle();
    let config = PageRankConfig::new()
        .with_alpha(0.0)
        .with_max_iterations(500);

    let result = PageRankWithPriors::new(&graph, config)
        .with_edge_weights(|e: &u32| weights[e])
        .evaluate()
        .unwrap();

    assert!(result.converged);
    assert!((result.score(&0).unwrap() - 0.0).abs() < EPSILON);
    assert!((result.score(&1).unwrap() - 0.4).abs() < EPSILON);
    assert!((result.score(&2).unwrap() - 0.4).abs() < EPSILON);
    assert!((result.score(&3).unwrap() - 0.2).abs() < EPSILON);

    let top = result.top_n(2);
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|(v, _)| *v == 1 || *v == 2));
    assert_eq!(result.sorted().last().map(|(v, _)| *v), Some(0));
}

#[test]
fn test_sink_mass_follows_priors() {
    let mut graph: SparseGraph<&str, u32> = SparseGraph::new();
    graph.add_directed_edge(1, "a", "b").unwrap();

    let result = page_rank(&graph, 0.0).unwrap();
    assert!((result.score(&"a").unwrap() - 1.0 / 3.0).abs() < EPSILON);
    assert!((result.score(&"b").unwrap() - 2.0 / 3.0).abs() < EPSILON);
}

#[test]
fn test_scores_sum_to_one() {
    let mut generator = BarabasiAlbertGenerator::new(counter(), counter(), 3, 2, 42).unwrap();
    generator.evolve_graph(40).unwrap();
    let graph = generator.into_graph();

    let result = page_rank(&graph, 0.15).unwrap();
    assert_eq!(result.scores.len(), graph.vertex_count());
    assert!((result.total() - 1.0).abs() < 1e-6);
    assert!(result.scores.values().all(|&s| s > 0.0));
}

#[test]
fn test_full_teleport_returns_priors() {
    let (graph, _) = weighted_cycle();
    let priors = [0.4, 0.3, 0.2, 0.1];

    let result = PageRankWithPriors::new(&graph, PageRankConfig::new().with_alpha(1.0))
        .with_priors(|v: &u32| priors[*v as usize])
        .evaluate()
        .unwrap();

    assert!(result.converged);
    for (v, prior) in (0_u32..).zip(priors) {
        assert!((result.score(&v).unwrap() - prior).abs() < 1e-9);
    }
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let (graph, _) = weighted_cycle();

    for alpha in [-0.1, 1.5, f64::NAN] {
        assert!(matches!(
            page_rank(&graph, alpha),
            Err(Error::InvalidParameter(_))
        ));
    }

    let negative_weight = PageRankWithPriors::new(&graph, PageRankConfig::default())
        .with_edge_weights(|e: &u32| if *e == 2 { -1.0 } else { 1.0 })
        .evaluate();
    assert!(matches!(negative_weight, Err(Error::InvalidParameter(_))));

    let negative_prior = PageRankWithPriors::new(&graph, PageRankConfig::default())
        .with_priors(|_: &u32| -0.25)
        .evaluate();
    assert!(matches!(negative_prior, Err(Error::InvalidParameter(_))));

    let zero_tolerance = PageRankConfig::default().with_tolerance(0.0);
    assert!(zero_tolerance.validate().is_err());
}

#[test]
fn test_empty_graph() {
    let graph: SparseGraph<u32, u32> = SparseGraph::new();
    let result = page_rank(&graph, 0.15).unwrap();
    assert!(result.scores.is_empty());
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
}

#[test]
fn test_iteration_cap_reports_not_converged() {
    let (graph, _) = weighted_cycle();
    let config = PageRankConfig::new()
        .with_alpha(0.0)
        .with_max_iterations(1)
        .with_tolerance(1e-12);

    let result = PageRankWithPriors::new(&graph, config).evaluate().unwrap();
    assert_eq!(result.iterations, 1);
    assert!(!result.converged);
    assert!(result.final_delta > 0.0);
}

#[test]
fn test_undirected_triangle_is_uniform() {
    let mut graph: SparseGraph<char, u32> = SparseGraph::new();
    graph.add_undirected_edge(1, 'x', 'y').unwrap();
    graph.add_undirected_edge(2, 'y', 'z').unwrap();
    graph.add_undirected_edge(3, 'z', 'x').unwrap();

    let result = page_rank(&graph, 0.15).unwrap();
    for v in ['x', 'y', 'z'] {
        assert!((result.score(&v).unwrap() - 1.0 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: PageRankConfig = serde_json::from_str(r#"{"alpha": 0.3}"#).unwrap();
    assert!((config.alpha - 0.3).abs() < f64::EPSILON);
    assert_eq!(config.max_iterations, 100);
    assert!(config.validate().is_ok());
}
