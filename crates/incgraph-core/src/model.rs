//! Core data structures for the include graph

use serde::{Deserialize, Serialize};

/// Stable identifier for a file node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub u64);

/// Stable identifier for an include edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct EdgeId(pub u64);

/// Rough classification of a file, from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// A compilable translation unit (`.c`, `.cpp`, ...).
    Source,
    /// A header (`.h`, `.hpp`, extensionless standard headers, ...).
    Header,
    Other,
}

impl FileKind {
    /// Detect the kind from a file name.
    pub fn from_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            // `<vector>`, `<string>`: standard library headers have no extension.
            None => return FileKind::Header,
        };
        match ext.as_str() {
            "c" | "cc" | "cpp" | "cxx" | "c++" | "m" | "mm" => FileKind::Source,
            "h" | "hh" | "hpp" | "hxx" | "h++" | "inl" | "ipp" | "tcc" | "inc" => FileKind::Header,
            _ => FileKind::Other,
        }
    }
}

/// A file in the include graph. One node exists per normalized path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileNode {
    pub id: NodeId,
    /// Normalized path, case preserved as first seen.
    pub path: String,
    /// Lookup key the node is indexed under.
    pub key: String,
    /// Final path component.
    pub name: String,
    pub kind: FileKind,
}

/// A directed "includes" relationship between two files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Include {
    pub id: EdgeId,
    /// The including file.
    pub source: NodeId,
    /// The included file.
    pub target: NodeId,
    /// Nesting level within the trace that discovered it (0 = direct include of the root).
    pub depth: u32,
    /// Discovery sequence number across the whole graph. Orders a node's includes.
    pub order: u64,
}
