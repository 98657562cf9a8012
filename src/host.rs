//! Build host that replays a captured compiler transcript

use async_trait::async_trait;
use incgraph_core::FileKind;
use incgraph_trace::BuildHost;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Serves a transcript captured from an earlier compile as the output of
/// "compiling" the file. The include-tracing flag is kept in memory only.
pub struct TranscriptHost {
    transcript: String,
    include_dirs: Vec<PathBuf>,
    tracing_enabled: AtomicBool,
}

impl TranscriptHost {
    pub fn new(transcript: String, include_dirs: Vec<PathBuf>) -> Self {
        Self {
            transcript,
            include_dirs,
            tracing_enabled: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BuildHost for TranscriptHost {
    async fn check_traceable(&self, file: &Path) -> Result<(), String> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| "no file name".to_string())?;
        match FileKind::from_name(&name) {
            FileKind::Source => Ok(()),
            FileKind::Header => Err("headers are not compiled on their own".to_string()),
            FileKind::Other => Err("not a C or C++ source file".to_string()),
        }
    }

    async fn include_tracing(&self, _file: &Path) -> Result<bool, String> {
        Ok(self.tracing_enabled.load(Ordering::SeqCst))
    }

    async fn set_include_tracing(&self, _file: &Path, enabled: bool) -> Result<(), String> {
        self.tracing_enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn include_directories(&self, _file: &Path) -> Vec<PathBuf> {
        self.include_dirs.clone()
    }

    async fn compile_with_trace(&self, _file: &Path) -> Result<String, String> {
        if !self.tracing_enabled.load(Ordering::SeqCst) {
            return Err("include tracing was not enabled".to_string());
        }
        Ok(self.transcript.clone())
    }
}
