//! Application types for CLI commands.

use crate::{
    cli::{Dialect, Format},
    engine::EngineReport
};

/// Parameters for the analyze command.
///
/// # Example
///
/// ```
/// use crud_resolver::{app::AnalyzeParams, cli::Format};
///
/// let params = AnalyzeParams {
///     facts_path:    "facts.json".to_string(),
///     dialect:       None,
///     output_format: Format::Text,
///     sequential:    false,
///     verbose:       false,
///     no_color:      true
/// };
/// assert!(params.dialect.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    /// Path to the facts file or "-" for JSON on stdin.
    pub facts_path:    String,
    /// Dialect override; the configured dialect applies when absent.
    pub dialect:       Option<Dialect>,
    pub output_format: Format,
    /// Resolve endpoints on a single thread.
    pub sequential:    bool,
    /// Include run statistics in text output.
    pub verbose:       bool,
    pub no_color:      bool
}

/// Result of the analyze command.
#[derive(Debug, Clone)]
pub struct AnalyzeResult {
    /// Process exit code, 0 unless the run failed.
    pub exit_code: i32,
    /// Rendered report.
    pub output:    String,
    pub report:    EngineReport
}
