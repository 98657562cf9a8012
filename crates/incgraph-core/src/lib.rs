//! incgraph core: include graph store, path normalization and graph cache

pub mod graph;
pub mod model;
pub mod path;
pub mod cache;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, EdgeId, FileKind, FileNode, Include};
pub use graph::IncludeGraph;
pub use path::{CaseSensitivity, NormalizedPath, normalize_path, is_absolute_path};
pub use cache::{CACHE_DIR, GRAPH_CACHE, GraphSnapshot, cache_dir, graph_cache_path, ensure_cache_dir, save_graph, load_graph, clear_cache};
