use colored::Colorize;
use indexmap::IndexMap;

use crate::{
    engine::EngineReport,
    model::{CrudLink, Endpoint}
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Format an engine report based on output options
pub fn format_report(report: &EngineReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => format_text_report(report, opts)
    }
}

fn format_text_report(report: &EngineReport, opts: &OutputOptions) -> String {
    let mut output = String::new();
    push_heading(&mut output, "=== CRUD Links ===", opts);

    if report.links.is_empty() {
        let note = "No CRUD links produced";
        if opts.colored {
            output.push_str(&note.yellow().to_string());
        } else {
            output.push_str(note);
        }
        output.push_str("\n\n");
    }

    let mut by_endpoint: IndexMap<&Endpoint, Vec<&CrudLink>> = IndexMap::new();
    for link in &report.links {
        by_endpoint.entry(link.endpoint()).or_default().push(link);
    }
    for (endpoint, links) in by_endpoint {
        let header = endpoint.to_string();
        if opts.colored {
            output.push_str(&header.cyan().bold().to_string());
        } else {
            output.push_str(&header);
        }
        output.push('\n');
        for link in links {
            output.push_str(&format!(
                "  {} {}\n",
                crud_label(link.crud_code(), opts.colored),
                link.table()
            ));
        }
        output.push('\n');
    }

    if !report.batch_jobs.is_empty() {
        push_heading(&mut output, "=== Batch Jobs ===", opts);
        for job in &report.batch_jobs {
            output.push_str(&format!("  {} ({})\n", job.job_name, job.class_name));
        }
        output.push('\n');
    }

    let stats = &report.stats;
    output.push_str(&format!(
        "Links: {}, tables: {}, endpoints with links: {}/{}\n",
        stats.links, stats.distinct_tables, stats.endpoints_with_links, stats.endpoints_analyzed
    ));

    if opts.verbose {
        output.push_str(&format!(
            "Call graph: {} nodes, {} edges\n",
            stats.graph_nodes, stats.graph_edges
        ));
        output.push_str(&format!(
            "Mappings: {} prepared, {} dropped, {} without operation\n",
            stats.mappings_prepared, stats.mappings_dropped, stats.mappings_unknown
        ));
        output.push_str(&format!(
            "Endpoints: {} filtered out, {} without data-access calls\n",
            stats.endpoints_skipped, stats.endpoints_without_terminals
        ));
        let tiers: Vec<String> = stats
            .tier_hits
            .iter()
            .map(|(tier, hits)| format!("{}={}", tier, hits))
            .collect();
        if !tiers.is_empty() {
            output.push_str(&format!("Tier hits: {}\n", tiers.join(", ")));
        }
        for dropped in &report.dropped_mappings {
            let line = format!("Dropped {}: {}", dropped.mapping, dropped.reason);
            if opts.colored {
                output.push_str(&line.red().to_string());
            } else {
                output.push_str(&line);
            }
            output.push('\n');
        }
    }

    output
}

fn push_heading(output: &mut String, heading: &str, opts: &OutputOptions) {
    if opts.colored {
        output.push_str(&heading.bold().to_string());
    } else {
        output.push_str(heading);
    }
    output.push_str("\n\n");
}

fn crud_label(code: char, colored: bool) -> String {
    let label = code.to_string();
    if !colored {
        return label;
    }
    match code {
        'S' => label.green().to_string(),
        'I' => label.cyan().to_string(),
        'U' => label.yellow().to_string(),
        'D' => label.red().to_string(),
        _ => label
    }
}
