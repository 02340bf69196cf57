//! Analyze command implementation.
//!
//! Reads the facts document, applies command-line overrides to the loaded
//! configuration, runs the engine and renders the report.

use super::{
    convert::convert_dialect,
    helpers::{create_output_options, read_facts_input},
    types::{AnalyzeParams, AnalyzeResult}
};
use crate::{config::Config, engine::CrudEngine, error::AppResult, output::format_report};

/// Apply command-line overrides on top of loaded configuration.
pub fn apply_overrides(params: &AnalyzeParams, mut config: Config) -> Config {
    if let Some(dialect) = params.dialect {
        config.sql.dialect = convert_dialect(dialect);
    }
    if params.sequential {
        config.engine.parallel = false;
    }
    config
}

/// Run the analyze command
pub fn run_analyze(params: AnalyzeParams, config: Config) -> AppResult<AnalyzeResult> {
    let facts = read_facts_input(&params.facts_path)?;
    let config = apply_overrides(&params, config);
    let engine = CrudEngine::from_config(&config);
    let report = engine.run(&facts);
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    let output = format_report(&report, &output_opts);
    Ok(AnalyzeResult {
        exit_code: 0,
        output,
        report
    })
}
