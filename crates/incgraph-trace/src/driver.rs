//! Compile-and-trace orchestration
//!
//! A trace needs the build host to compile one file with include tracing
//! switched on, which ties up the host's build. [`TraceDriver`] therefore
//! allows a single trace at a time: a second request while one is in flight
//! fails with [`TraceError::Busy`] instead of queueing.

use crate::config::TraceConfig;
use crate::error::{Result, TraceError};
use crate::parser::{TraceSummary, extend_graph_from_trace};
use async_trait::async_trait;
use incgraph_core::IncludeGraph;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// The build system a trace runs against.
#[async_trait]
pub trait BuildHost: Send + Sync {
    /// `Ok` when `file` can be compiled on its own, otherwise the reason it cannot.
    async fn check_traceable(&self, file: &Path) -> std::result::Result<(), String>;

    /// Current state of the compiler's include-tracing flag for `file`'s project.
    async fn include_tracing(&self, file: &Path) -> std::result::Result<bool, String>;

    /// Switch the include-tracing flag for `file`'s project.
    async fn set_include_tracing(&self, file: &Path, enabled: bool) -> std::result::Result<(), String>;

    /// The project's include search directories, highest priority first.
    async fn include_directories(&self, file: &Path) -> Vec<PathBuf>;

    /// Compile `file` and return the captured compiler output.
    async fn compile_with_trace(&self, file: &Path) -> std::result::Result<String, String>;
}

/// Holds the driver's single trace slot. Released on drop.
#[derive(Debug)]
pub struct TraceSession<'a> {
    slot: &'a Mutex<Option<PathBuf>>,
    file: PathBuf,
}

impl TraceSession<'_> {
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl Drop for TraceSession<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

/// Runs traces against a [`BuildHost`], one at a time.
pub struct TraceDriver<H> {
    host: H,
    config: TraceConfig,
    in_flight: Mutex<Option<PathBuf>>,
}

impl<H: BuildHost> TraceDriver<H> {
    pub fn new(host: H, config: TraceConfig) -> Self {
        Self {
            host,
            config,
            in_flight: Mutex::new(None),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Whether a trace currently holds the session.
    pub fn is_busy(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Claim the trace slot for `file`.
    pub fn try_begin(&self, file: &Path) -> Result<TraceSession<'_>> {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = slot.as_ref() {
            return Err(TraceError::Busy {
                in_flight: current.display().to_string(),
            });
        }
        *slot = Some(file.to_path_buf());
        Ok(TraceSession {
            slot: &self.in_flight,
            file: file.to_path_buf(),
        })
    }

    /// Compile `file` with include tracing and merge the trace into `graph`.
    ///
    /// The tracing flag is put back to its previous value whether the
    /// compile or the parse succeeds or fails. A malformed trace leaves the
    /// edges parsed before the failure in `graph`.
    pub async fn extend_graph(&self, graph: &mut IncludeGraph, file: &Path) -> Result<TraceSummary> {
        let session = self.try_begin(file)?;
        let file_label = file.display().to_string();

        self.host
            .check_traceable(file)
            .await
            .map_err(|reason| TraceError::NotTraceable {
                file: file_label.clone(),
                reason,
            })?;

        let previous = self
            .host
            .include_tracing(file)
            .await
            .map_err(TraceError::TracingFlag)?;
        self.host
            .set_include_tracing(file, true)
            .await
            .map_err(TraceError::TracingFlag)?;

        let result = self.compile_and_parse(graph, file).await;

        if let Err(reason) = self.host.set_include_tracing(file, previous).await {
            tracing::warn!("Failed to restore include tracing for {}: {}", file_label, reason);
        }
        drop(session);

        match &result {
            Ok(summary) => tracing::debug!("Trace of {} finished: {:?}", file_label, summary),
            Err(e) => tracing::warn!("Trace of {} failed: {}", file_label, e),
        }
        result
    }

    async fn compile_and_parse(&self, graph: &mut IncludeGraph, file: &Path) -> Result<TraceSummary> {
        let output = self
            .host
            .compile_with_trace(file)
            .await
            .map_err(|reason| TraceError::CompileFailed {
                file: file.display().to_string(),
                reason,
            })?;

        let mut search_dirs = self.host.include_directories(file).await;
        search_dirs.extend(self.config.include_dirs.iter().cloned());

        extend_graph_from_trace(
            graph,
            &file.to_string_lossy(),
            &search_dirs,
            &output,
            &self.config,
        )
    }
}
