//! Include-trace parsing and compile-and-trace orchestration

pub mod config;
pub mod driver;
pub mod error;
pub mod parser;
pub mod resolver;


pub use config::{CONFIG_FILE, DEFAULT_MARKER, TraceConfig};
pub use driver::{BuildHost, TraceDriver, TraceSession};
pub use error::{ErrorKind, Result, TraceError};
pub use parser::{TraceLine, TraceParser, TraceSummary, extend_graph_from_trace, split_lines};
pub use resolver::IncludeResolver;
