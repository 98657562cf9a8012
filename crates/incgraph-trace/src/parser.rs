//! Include-trace parser
//!
//! A compiler's include trace (MSVC `/showIncludes`) is one depth-first walk
//! of a translation unit's include tree, one line per opened header, with the
//! nesting depth encoded as the number of spaces after a fixed marker:
//!
//! ```text
//! Note: including file: C:\proj\inc\a.h
//! Note: including file:  C:\proj\inc\detail\a_impl.h
//! Note: including file: C:\proj\inc\b.h
//! ```
//!
//! The parser replays that walk against a stack of ancestor nodes and merges
//! every include it sees into a shared [`IncludeGraph`].

use crate::config::TraceConfig;
use crate::error::{Result, TraceError};
use crate::resolver::IncludeResolver;
use incgraph_core::{IncludeGraph, NodeId};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

/// Split `text` into lines on `\r\n`, `\r` or `\n`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK.split(text)
}

/// One recognized include-trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLine<'a> {
    /// Spaces between the marker and the path. 0 = included by the root.
    pub depth: usize,
    /// Included path as the compiler reported it.
    pub path: &'a str,
}

/// Recognizes include-trace lines by their marker.
#[derive(Debug, Clone)]
pub struct TraceParser {
    marker: String,
}

impl TraceParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(config.marker.clone())
    }

    /// Parse a single line. Lines without the marker are build noise and
    /// yield `None`.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<TraceLine<'a>> {
        let start = line.find(&self.marker)? + self.marker.len();
        let rest = &line[start..];
        let path = rest.trim_start_matches(' ');
        Some(TraceLine {
            depth: rest.len() - path.len(),
            path: path.trim_end(),
        })
    }
}

/// What one successful trace contributed to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSummary {
    /// Node of the translation unit.
    pub root: NodeId,
    /// Recognized trace lines.
    pub lines_seen: usize,
    pub includes_added: usize,
    pub nodes_created: usize,
    /// Deepest stack level reached (0 = direct includes only).
    pub max_depth: usize,
}

/// Merge the include trace `text` of translation unit `root` into `graph`.
///
/// Reported include names are resolved against the unit's own directory,
/// then `search_dirs` in order. On error the edges added before the failing
/// line stay in the graph; no node is ever duplicated.
///
/// A line more than one level deeper than its predecessor descends exactly
/// one level, into the previously reported include.
pub fn extend_graph_from_trace(
    graph: &mut IncludeGraph,
    root: &str,
    search_dirs: &[PathBuf],
    text: &str,
    config: &TraceConfig,
) -> Result<TraceSummary> {
    let parser = TraceParser::from_config(config);
    let resolver = IncludeResolver::for_translation_unit(root, search_dirs);
    let nodes_before = graph.node_count();

    let root_id = graph.create_or_get(root);
    let mut stack: Vec<NodeId> = vec![root_id];
    let mut summary = TraceSummary {
        root: root_id,
        lines_seen: 0,
        includes_added: 0,
        nodes_created: 0,
        max_depth: 0,
    };

    for (index, line) in split_lines(text).enumerate() {
        let Some(trace_line) = parser.parse_line(line) else {
            continue;
        };
        let line_number = index + 1;
        summary.lines_seen += 1;

        if trace_line.path.is_empty() {
            return Err(TraceError::MalformedTrace {
                line: line_number,
                message: "no path after the include marker".to_string(),
            });
        }

        if trace_line.depth >= stack.len() {
            let top = stack.last().copied().unwrap_or(root_id);
            let Some(previous) = graph.last_include(top) else {
                let name = graph.node(top).map(|n| n.path.as_str()).unwrap_or("?");
                return Err(TraceError::MalformedTrace {
                    line: line_number,
                    message: format!(
                        "depth {} descends below '{}', which has no includes yet",
                        trace_line.depth, name
                    ),
                });
            };
            stack.push(previous.target);
        }
        while trace_line.depth + 1 < stack.len() {
            stack.pop();
        }

        let parent = stack.last().copied().unwrap_or(root_id);
        let level = stack.len() - 1;
        let resolved = resolver.resolve(trace_line.path);
        let child = graph.create_or_get(&resolved);
        if graph.add_include(parent, child, level as u32).is_none() {
            return Err(TraceError::MalformedTrace {
                line: line_number,
                message: format!("cannot link '{}' to its includer", resolved),
            });
        }

        tracing::debug!(level, "{} includes {}", parent.0, resolved);
        summary.includes_added += 1;
        summary.max_depth = summary.max_depth.max(level);
    }

    summary.nodes_created = graph.node_count() - nodes_before;
    tracing::info!(
        "Traced {}: {} includes, {} new files, max depth {}",
        root,
        summary.includes_added,
        summary.nodes_created,
        summary.max_depth
    );
    Ok(summary)
}
