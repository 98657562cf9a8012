//! Lexical path normalization for graph keys
//!
//! Compilers report the same header with different spellings depending on how
//! it was reached (`..\inc\a.h`, `C:/proj/INC/a.h`, ...). Every path that enters
//! the graph goes through [`normalize_path`] so that those spellings land on one
//! node. Normalization never touches the filesystem.

use serde::{Deserialize, Serialize};

/// How path keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Keys are folded to lowercase (Windows / default macOS filesystems).
    #[default]
    Insensitive,
    /// Keys are compared byte for byte.
    Sensitive,
}

/// A path after separator, segment and case normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedPath {
    /// Normalized spelling, case preserved. Used for display.
    pub display: String,
    /// Lookup key. Equal to `display` unless case is folded.
    pub key: String,
}

/// Normalize `raw` into a [`NormalizedPath`].
///
/// Backslashes become `/`, empty and `.` segments are dropped and `..` is
/// resolved against the preceding segment. A `..` that would climb above an
/// absolute root is discarded; on a relative path it is kept.
pub fn normalize_path(raw: &str, case: CaseSensitivity) -> NormalizedPath {
    let unified = raw.trim().replace('\\', "/");
    let (prefix, rest) = split_prefix(&unified);
    let rooted = !prefix.is_empty();

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut display = prefix;
    display.push_str(&segments.join("/"));
    if display.is_empty() {
        display.push('.');
    }

    let key = match case {
        CaseSensitivity::Insensitive => display.to_lowercase(),
        CaseSensitivity::Sensitive => display.clone(),
    };

    NormalizedPath { display, key }
}

/// Whether `raw` names an absolute location (POSIX root, drive letter or UNC share).
pub fn is_absolute_path(raw: &str) -> bool {
    let raw = raw.trim();
    raw.starts_with('/') || raw.starts_with('\\') || drive_letter(raw).is_some()
}

/// Final path component, after normalization.
pub fn file_name(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or(normalized)
}

/// Split a unified (forward-slash) path into its root prefix and the remainder.
fn split_prefix(unified: &str) -> (String, &str) {
    if let Some(drive) = drive_letter(unified) {
        let rest = &unified[2..];
        return (format!("{}:/", drive.to_ascii_uppercase()), rest);
    }
    if let Some(rest) = unified.strip_prefix("//") {
        // UNC: keep server and share together as the root.
        let mut parts = rest.splitn(3, '/');
        let server = parts.next().unwrap_or_default();
        let share = parts.next().unwrap_or_default();
        let tail = parts.next().unwrap_or_default();
        let prefix = if share.is_empty() {
            format!("//{}/", server)
        } else {
            format!("//{}/{}/", server, share)
        };
        return (prefix, tail);
    }
    if let Some(rest) = unified.strip_prefix('/') {
        return ("/".to_string(), rest);
    }
    (String::new(), unified)
}

fn drive_letter(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    let letter = chars.next()?;
    if letter.is_ascii_alphabetic() && chars.next() == Some(':') {
        Some(letter)
    } else {
        None
    }
}
