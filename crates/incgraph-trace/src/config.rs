//! Trace configuration
//!
//! Load order: `<root>/incgraph.toml` → defaults.

use crate::error::{Result, TraceError};
use incgraph_core::CaseSensitivity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the project root.
pub const CONFIG_FILE: &str = "incgraph.toml";

/// Marker MSVC prints in front of every `/showIncludes` line.
pub const DEFAULT_MARKER: &str = "Note: including file: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Text that identifies an include-trace line. Everything after it is
    /// indentation followed by the included path. Localized compilers print
    /// a translated marker.
    pub marker: String,
    /// How paths are compared when deduplicating nodes.
    pub case_sensitivity: CaseSensitivity,
    /// Extra include search directories, tried after the host's own.
    pub include_dirs: Vec<PathBuf>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            case_sensitivity: CaseSensitivity::default(),
            include_dirs: Vec::new(),
        }
    }
}

impl TraceConfig {
    /// Load `incgraph.toml` from `root`, or defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content).map_err(|message| TraceError::Config {
            path: path.clone(),
            message,
        })?;
        tracing::debug!("Loaded trace config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        let config: TraceConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.marker.trim().is_empty() {
            return Err("marker must not be empty".to_string());
        }
        Ok(config)
    }
}
