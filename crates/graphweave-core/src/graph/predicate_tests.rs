//! Tests for predicate-induced subgraphs.

use super::predicate::{FnPredicate, GraphPredicate};
use super::sparse::SparseGraph;

/// Keeps even vertices and directed edges only.
struct EvenDirected;

impl GraphPredicate<u32, u32> for EvenDirected {
    fn evaluate_vertex(&self, _graph: &SparseGraph<u32, u32>, vertex: &u32) -> bool {
        vertex % 2 == 0
    }

    fn evaluate_edge(&self, graph: &SparseGraph<u32, u32>, edge: &u32) -> bool {
        graph.is_directed(edge).unwrap_or(false)
    }
}

fn build_graph() -> SparseGraph<u32, u32> {
    let mut graph = SparseGraph::new();
    graph.add_directed_edge(1, 2, 4).unwrap();
    graph.add_undirected_edge(2, 4, 6).unwrap();
    graph.add_directed_edge(3, 6, 3).unwrap();
    graph.add_directed_edge(4, 6, 2).unwrap();
    graph
}

#[test]
fn test_filtered_keeps_induced_edges() {
    let graph = build_graph();
    let sub = graph.filtered(&EvenDirected).unwrap();

    assert_eq!(sub.vertex_count(), 3);
    assert!(!sub.contains_vertex(&3));
    // Edge 3 lost an endpoint; edge 2 is undirected.
    assert!(sub.contains_edge(&1));
    assert!(!sub.contains_edge(&2));
    assert!(!sub.contains_edge(&3));
    assert!(sub.contains_edge(&4));

    // Source graph untouched.
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn test_fn_predicate() {
    let graph = build_graph();
    let keep_all_vertices = FnPredicate::new(
        |_: &SparseGraph<u32, u32>, _: &u32| true,
        |g: &SparseGraph<u32, u32>, e: &u32| g.source(e).is_ok_and(|s| *s == 6),
    );
    let sub = graph.filtered(&keep_all_vertices).unwrap();
    assert_eq!(sub.vertex_count(), graph.vertex_count());
    assert_eq!(sub.edge_count(), 2);
    assert!(sub.contains_edge(&3) && sub.contains_edge(&4));
}
