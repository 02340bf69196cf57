//! Helper functions for CLI operations.

use std::{
    fs::read_to_string,
    io::{self, Read},
    path::Path
};

use super::convert::convert_format;
use crate::{
    cli::Format,
    config::Config,
    error::{AppResult, facts_parse_error, file_read_error},
    model::Facts,
    output::OutputOptions
};

/// Serialization format of a facts document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactsFormat {
    Json,
    Yaml,
    Toml
}

impl FactsFormat {
    /// Pick the format from a file extension; anything unknown is JSON.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json
        }
    }
}

/// Reads a facts document from a file or stdin.
///
/// Standard input (`-`) is read as JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a valid facts
/// document.
pub fn read_facts_input(path: &str) -> AppResult<Facts> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        parse_facts(&buffer, FactsFormat::Json, "stdin")
    } else {
        let content = read_to_string(path).map_err(|e| file_read_error(path, e))?;
        parse_facts(&content, FactsFormat::from_path(path), path)
    }
}

/// Parses a facts document.
///
/// # Example
///
/// ```
/// use crud_resolver::app::{FactsFormat, parse_facts};
///
/// let facts = parse_facts(r#"{"endpoints": []}"#, FactsFormat::Json, "inline").unwrap();
/// assert!(facts.endpoints.is_empty());
/// ```
///
/// # Errors
///
/// Returns a bad-request error naming `origin` when the document is invalid.
pub fn parse_facts(content: &str, format: FactsFormat, origin: &str) -> AppResult<Facts> {
    match format {
        FactsFormat::Json => {
            serde_json::from_str(content).map_err(|e| facts_parse_error(origin, e.to_string()))
        }
        FactsFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| facts_parse_error(origin, e.to_string()))
        }
        FactsFormat::Toml => {
            toml::from_str(content).map_err(|e| facts_parse_error(origin, e.to_string()))
        }
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Log level used when `CRUD_RESOLVER_LOG` is unset.
///
/// `--verbose` raises the level to `info`; otherwise the configured level or
/// `warn` applies.
pub fn effective_log_level(verbose: bool, config: &Config) -> String {
    if verbose {
        return String::from("info");
    }
    config
        .log
        .level
        .clone()
        .unwrap_or_else(|| String::from("warn"))
}
