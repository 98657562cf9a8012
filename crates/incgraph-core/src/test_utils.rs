//! Test utilities for incgraph-core

use crate::graph::IncludeGraph;

/// Build a graph from `(includer, included)` pairs, in order, all at depth 0.
pub fn graph_from_edges(edges: &[(&str, &str)]) -> IncludeGraph {
    let mut graph = IncludeGraph::new();
    for (source, target) in edges {
        let source = graph.create_or_get(source);
        let target = graph.create_or_get(target);
        graph.add_include(source, target, 0).unwrap();
    }
    graph
}

/// Display paths of the files `path` directly includes, in discovery order.
pub fn include_paths(graph: &IncludeGraph, path: &str) -> Vec<String> {
    let id = graph.find(path).unwrap_or_else(|| panic!("no node for {}", path));
    graph
        .includes(id)
        .into_iter()
        .map(|include| graph.node(include.target).unwrap().path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_from_edges() {
        let graph = graph_from_edges(&[("/a.c", "/b.h"), ("/a.c", "/c.h")]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(include_paths(&graph, "/a.c"), vec!["/b.h", "/c.h"]);
    }
}
