// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use crud_resolver::{
    engine::{CrudEngine, EngineReport},
    model::{BatchJob, CallEdge, Endpoint, Facts, Operation, SqlMapping},
    output::{OutputFormat, OutputOptions, format_report}
};

fn sample_report() -> EngineReport {
    let facts = Facts {
        endpoints:    vec![Endpoint::new("GET", "/orders", "OrderController", "list", "")],
        call_edges:   vec![CallEdge::new("OrderController", "list", "OrderMapper", "findAll")],
        sql_mappings: vec![SqlMapping::new(
            "OrderMapper",
            "findAll",
            Operation::Select,
            None,
            &["orders", "customers"]
        )],
        batch_jobs:   vec![BatchJob::new("ReportJob", "dailyReport", "com.example.batch")]
    };
    CrudEngine::default().run(&facts)
}

fn plain(format: OutputFormat, verbose: bool) -> OutputOptions {
    OutputOptions {
        format,
        colored: false,
        verbose
    }
}

#[test]
fn test_output_format_default() {
    let format = OutputFormat::default();
    assert!(matches!(format, OutputFormat::Text));
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
    assert!(!opts.verbose);
}

#[test]
fn test_text_report() {
    let output = format_report(&sample_report(), &plain(OutputFormat::Text, false));
    assert!(output.contains("=== CRUD Links ==="));
    assert!(output.contains("GET /orders (OrderController#list)"));
    assert!(output.contains("  S orders"));
    assert!(output.contains("  S customers"));
    assert!(output.contains("dailyReport (ReportJob)"));
    assert!(output.contains("Links: 2, tables: 2, endpoints with links: 1/1"));
    assert!(!output.contains("Tier hits"));
}

#[test]
fn test_text_report_verbose() {
    let output = format_report(&sample_report(), &plain(OutputFormat::Text, true));
    assert!(output.contains("Call graph: 2 nodes, 1 edges"));
    assert!(output.contains("Tier hits: exact=1"));
}

#[test]
fn test_text_report_empty() {
    let report = CrudEngine::default().run(&Facts::default());
    let output = format_report(&report, &plain(OutputFormat::Text, false));
    assert!(output.contains("No CRUD links produced"));
}

#[test]
fn test_json_report() {
    let output = format_report(&sample_report(), &plain(OutputFormat::Json, false));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["links"].as_array().map(|l| l.len()), Some(2));
    assert_eq!(value["links"][0]["crud_code"], "S");
    assert_eq!(value["links"][0]["endpoint"]["http_method"], "GET");
    assert_eq!(value["stats"]["distinct_tables"], 2);
}

#[test]
fn test_yaml_report() {
    let output = format_report(&sample_report(), &plain(OutputFormat::Yaml, false));
    assert!(output.contains("links:"));
    assert!(output.contains("table: orders"));
    assert!(output.contains("batch_jobs:"));
}

#[test]
fn test_colored_output_still_contains_tables() {
    let opts = OutputOptions {
        format:  OutputFormat::Text,
        colored: true,
        verbose: false
    };
    let output = format_report(&sample_report(), &opts);
    assert!(output.contains("orders"));
}
