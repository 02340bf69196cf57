//! Application logic for the CRUD Resolver CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

mod analyze;
mod convert;
mod helpers;
mod types;

pub use analyze::{apply_overrides, run_analyze};
pub use convert::{convert_dialect, convert_format};
pub use helpers::{
    FactsFormat, create_output_options, effective_log_level, parse_facts, read_facts_input
};
pub use types::{AnalyzeParams, AnalyzeResult};
