//! Include graph store backed by petgraph::StableDiGraph
//!
//! Nodes are files, deduplicated by normalized path. Edges are include
//! relationships and are only ever appended, so node and edge indices stay
//! stable for the lifetime of the graph.

use crate::model::*;
use crate::path::{self, CaseSensitivity};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// The include graph, a directed multigraph of files keyed by normalized path.
pub struct IncludeGraph {
    pub(crate) inner: StableDiGraph<FileNode, Include>,
    pub(crate) index: HashMap<String, NodeId>,
    pub(crate) case_sensitivity: CaseSensitivity,
    pub(crate) next_order: u64,
}

impl std::fmt::Debug for IncludeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncludeGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .field("case_sensitivity", &self.case_sensitivity)
            .finish()
    }
}

impl IncludeGraph {
    pub fn new() -> Self {
        Self::with_case_sensitivity(CaseSensitivity::default())
    }

    pub fn with_case_sensitivity(case_sensitivity: CaseSensitivity) -> Self {
        IncludeGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
            case_sensitivity,
            next_order: 0,
        }
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    /// Get the node for `path`, creating it if no node with the same
    /// normalized key exists yet. Idempotent: equivalent spellings always
    /// return the same `NodeId`.
    pub fn create_or_get(&mut self, path: &str) -> NodeId {
        let normalized = path::normalize_path(path, self.case_sensitivity);
        if let Some(&id) = self.index.get(&normalized.key) {
            return id;
        }

        let name = path::file_name(&normalized.display).to_string();
        let node = FileNode {
            id: NodeId::default(),
            kind: FileKind::from_name(&name),
            name,
            path: normalized.display,
            key: normalized.key.clone(),
        };
        let idx = self.inner.add_node(node);
        let id = NodeId(idx.index() as u64);
        if let Some(weight) = self.inner.node_weight_mut(idx) {
            weight.id = id;
        }
        tracing::debug!("New file node {:?}: {}", id, normalized.key);
        self.index.insert(normalized.key, id);
        id
    }

    /// Look up the node for `path` without creating it.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let normalized = path::normalize_path(path, self.case_sensitivity);
        self.index.get(&normalized.key).copied()
    }

    /// Append an include edge `source -> target`. Returns `None` if either
    /// node does not exist.
    pub fn add_include(&mut self, source: NodeId, target: NodeId, depth: u32) -> Option<EdgeId> {
        let source_idx = self.node_index(source)?;
        let target_idx = self.node_index(target)?;

        let include = Include {
            id: EdgeId::default(),
            source,
            target,
            depth,
            order: self.next_order,
        };
        self.next_order += 1;

        let idx = self.inner.add_edge(source_idx, target_idx, include);
        let id = EdgeId(idx.index() as u64);
        if let Some(weight) = self.inner.edge_weight_mut(idx) {
            weight.id = id;
        }
        Some(id)
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&FileNode> {
        self.inner.node_weight(NodeIndex::new(id.0 as usize))
    }

    /// Get an edge by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&Include> {
        self.inner.edge_weight(EdgeIndex::new(id.0 as usize))
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes.
    pub fn all_nodes(&self) -> impl Iterator<Item = &FileNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges.
    pub fn all_edges(&self) -> impl Iterator<Item = &Include> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Files directly included by `source`, in discovery order.
    pub fn includes(&self, source: NodeId) -> Vec<&Include> {
        self.edges_sorted(source, Direction::Outgoing)
    }

    /// The most recently discovered include of `source`.
    pub fn last_include(&self, source: NodeId) -> Option<&Include> {
        let idx = self.node_index(source)?;
        self.inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge_ref| edge_ref.weight())
            .max_by_key(|include| include.order)
    }

    /// Files that directly include `target`, in discovery order.
    pub fn includers(&self, target: NodeId) -> Vec<&Include> {
        self.edges_sorted(target, Direction::Incoming)
    }

    /// Nodes nothing includes. After tracing these are the translation units.
    pub fn roots(&self) -> Vec<NodeId> {
        self.inner
            .node_indices()
            .filter(|&idx| {
                self.inner
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| NodeId(idx.index() as u64))
            .collect()
    }

    /// Every file reachable from `node`, excluding `node` itself.
    pub fn transitive_includes(&self, node: NodeId) -> HashSet<NodeId> {
        let mut reached = HashSet::new();
        let Some(start) = self.node_index(node) else {
            return reached;
        };

        let mut dfs = Dfs::new(&self.inner, start);
        while let Some(idx) = dfs.next(&self.inner) {
            if idx != start {
                reached.insert(NodeId(idx.index() as u64));
            }
        }
        reached
    }

    /// Whether any include cycle exists in the accumulated graph.
    pub fn has_cycle(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.inner)
    }

    /// Render the includes below `root` as an indented tree, two spaces per
    /// level. A file whose includes were already printed is listed again with
    /// a `(seen)` marker but not expanded a second time.
    pub fn render_tree(&self, root: NodeId) -> Option<String> {
        self.node(root)?;
        let mut out = String::new();
        let mut expanded = HashSet::new();
        self.render_node(root, 0, &mut expanded, &mut out);
        Some(out)
    }

    fn render_node(
        &self,
        id: NodeId,
        level: usize,
        expanded: &mut HashSet<NodeId>,
        out: &mut String,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        let indent = "  ".repeat(level);
        if !expanded.insert(id) {
            let _ = writeln!(out, "{}{} (seen)", indent, node.path);
            return;
        }
        let _ = writeln!(out, "{}{}", indent, node.path);
        for include in self.includes(id) {
            self.render_node(include.target, level + 1, expanded, out);
        }
    }

    fn edges_sorted(&self, id: NodeId, direction: Direction) -> Vec<&Include> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut edges: Vec<&Include> = self
            .inner
            .edges_directed(idx, direction)
            .map(|edge_ref| edge_ref.weight())
            .collect();
        edges.sort_by_key(|include| include.order);
        edges
    }

    fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        let idx = NodeIndex::new(id.0 as usize);
        self.inner.contains_node(idx).then_some(idx)
    }
}

impl Default for IncludeGraph {
    fn default() -> Self {
        Self::new()
    }
}
