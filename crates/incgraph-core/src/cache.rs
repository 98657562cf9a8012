//! Graph snapshots and the on-disk cache

use crate::graph::IncludeGraph;
use crate::model::*;
use crate::path::{self, CaseSensitivity};
use anyhow::{Context, bail};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cache directory: .incgraph/
pub const CACHE_DIR: &str = ".incgraph";

/// Graph cache file
pub const GRAPH_CACHE: &str = "graph.json";

/// Serializable form of an [`IncludeGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: String,
    pub saved_at: chrono::DateTime<chrono::Utc>,
    pub case_sensitivity: CaseSensitivity,
    /// Nodes in ID order.
    pub nodes: Vec<FileNode>,
    /// Edges in discovery order.
    pub edges: Vec<Include>,
}

impl IncludeGraph {
    /// Capture the graph as a snapshot.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<FileNode> = self.all_nodes().cloned().collect();
        nodes.sort_by_key(|node| node.id);
        let mut edges: Vec<Include> = self.all_edges().cloned().collect();
        edges.sort_by_key(|include| include.order);

        GraphSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: chrono::Utc::now(),
            case_sensitivity: self.case_sensitivity,
            nodes,
            edges,
        }
    }

    /// Rebuild a graph from a snapshot, keeping node IDs and include order.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> anyhow::Result<Self> {
        let mut graph = IncludeGraph::with_case_sensitivity(snapshot.case_sensitivity);

        for node in snapshot.nodes {
            let expected = graph.inner.node_count() as u64;
            if node.id.0 != expected {
                bail!("snapshot node ids are not contiguous: expected {}, found {}", expected, node.id.0);
            }
            if path::normalize_path(&node.path, snapshot.case_sensitivity).key != node.key {
                bail!(
                    "snapshot node {} has key {} which does not match its path under {:?} paths",
                    node.path,
                    node.key,
                    snapshot.case_sensitivity
                );
            }
            if graph.index.contains_key(&node.key) {
                bail!("snapshot contains duplicate node key {}", node.key);
            }
            let key = node.key.clone();
            graph.inner.add_node(node);
            graph.index.insert(key, NodeId(expected));
        }

        for include in snapshot.edges {
            let source = NodeIndex::new(include.source.0 as usize);
            let target = NodeIndex::new(include.target.0 as usize);
            if !graph.inner.contains_node(source) || !graph.inner.contains_node(target) {
                bail!("snapshot edge {:?} references a missing node", include.id);
            }
            graph.next_order = graph.next_order.max(include.order + 1);
            let idx = graph.inner.add_edge(source, target, include);
            if let Some(weight) = graph.inner.edge_weight_mut(idx) {
                weight.id = EdgeId(idx.index() as u64);
            }
        }

        Ok(graph)
    }
}

/// Get cache directory path
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR)
}

/// Get graph cache file path
pub fn graph_cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_DIR).join(GRAPH_CACHE)
}

/// Ensure cache directory exists
pub fn ensure_cache_dir(root: &Path) -> std::io::Result<()> {
    let cache = cache_dir(root);
    if !cache.exists() {
        std::fs::create_dir_all(&cache)?;
    }
    Ok(())
}

/// Serialize graph to the cache as JSON.
pub fn save_graph(graph: &IncludeGraph, root: &Path) -> anyhow::Result<()> {
    ensure_cache_dir(root)?;
    let path = graph_cache_path(root);

    let json_str = serde_json::to_string_pretty(&graph.snapshot())?;
    std::fs::write(&path, json_str)
        .with_context(|| format!("writing graph cache {}", path.display()))?;

    tracing::debug!("Graph cache saved: {}", path.display());
    Ok(())
}

/// Load graph from cache. `Ok(None)` when no cache exists.
pub fn load_graph(root: &Path) -> anyhow::Result<Option<IncludeGraph>> {
    let path = graph_cache_path(root);
    if !path.exists() {
        return Ok(None);
    }

    let json_str = std::fs::read_to_string(&path)
        .with_context(|| format!("reading graph cache {}", path.display()))?;
    let snapshot: GraphSnapshot = serde_json::from_str(&json_str)
        .with_context(|| format!("parsing graph cache {}", path.display()))?;

    tracing::debug!("Graph cache loaded from: {}", path.display());
    IncludeGraph::from_snapshot(snapshot).map(Some)
}

/// Clear cache directory
pub fn clear_cache(root: &Path) -> std::io::Result<()> {
    let cache = cache_dir(root);
    if cache.exists() {
        std::fs::remove_dir_all(&cache)?;
    }
    Ok(())
}
