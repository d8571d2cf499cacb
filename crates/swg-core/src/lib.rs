pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod parse;
pub mod pipeline;
pub mod plugin;
pub mod source;
pub mod transform;

pub use context::RunContext;
pub use diagnostics::{Diagnostic, Diagnostics, Resolved, Severity};
pub use pipeline::{Normalized, Pipeline, RunReport};
pub use plugin::{Plugin, PluginManager, TransformOutput};

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
