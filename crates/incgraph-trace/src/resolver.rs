//! Resolution of reported include names to absolute paths

use incgraph_core::{CaseSensitivity, is_absolute_path, normalize_path};
use std::path::{Path, PathBuf};

/// Ordered include search directories. First match wins.
#[derive(Debug, Clone, Default)]
pub struct IncludeResolver {
    search_dirs: Vec<PathBuf>,
}

impl IncludeResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Resolver for one translation unit: the unit's own directory comes
    /// first, then `search_dirs` in order.
    pub fn for_translation_unit(root: &str, search_dirs: &[PathBuf]) -> Self {
        let mut dirs = Vec::with_capacity(search_dirs.len() + 1);
        let root = normalize_path(root, CaseSensitivity::Sensitive);
        if let Some((parent, _)) = root.display.rsplit_once('/') {
            let parent = if parent.is_empty() { "/" } else { parent };
            dirs.push(PathBuf::from(parent));
        }
        dirs.extend(search_dirs.iter().cloned());
        Self { search_dirs: dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Resolve `reported` against the search directories. Absolute paths and
    /// names no directory contains are returned as reported.
    pub fn resolve(&self, reported: &str) -> String {
        if is_absolute_path(reported) {
            return reported.to_string();
        }

        let relative = if cfg!(windows) {
            reported.to_string()
        } else {
            reported.replace('\\', "/")
        };
        for dir in &self.search_dirs {
            let candidate = dir.join(&relative);
            if is_file(&candidate) {
                tracing::trace!("Resolved {} in {}", reported, dir.display());
                return candidate.to_string_lossy().into_owned();
            }
        }

        reported.to_string()
    }
}

fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
