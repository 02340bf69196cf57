//! CRUD resolution engine.
//!
//! One run turns a [`Facts`] bundle into an [`EngineReport`]:
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌────────────────────────────┐   ┌───────────┐
//! │ SQL mappings │──▶│  classify   │──▶│                            │   │           │
//! └──────────────┘   └─────────────┘   │  per endpoint (parallel):  │──▶│  report   │
//! ┌──────────────┐   ┌─────────────┐   │   resolve ──▶ match        │   │           │
//! │ call edges   │──▶│ build graph │──▶│                            │   │           │
//! └──────────────┘   └─────────────┘   └────────────────────────────┘   └───────────┘
//! ```
//!
//! The call graph is built once and only read afterwards, and every traversal
//! owns its visited set, so endpoints are resolved on [`rayon`] workers
//! without locking. Results are collected in endpoint order, so a parallel run
//! produces the same link sequence as a sequential one.
//!
//! A fault while classifying one mapping is logged and that mapping dropped;
//! it never aborts the run. A run without links is reported with a warning.

mod types;

use rayon::prelude::*;
use tracing::{debug, info, warn};
pub use types::{DroppedMapping, EngineReport, RunStats};

use crate::{
    classify::SqlClassifier,
    config::{Config, EngineConfig},
    error::AppResult,
    graph::{CallGraph, ReachabilityResolver},
    matcher::{MappingMatcher, MatchResult},
    model::{CrudLink, Endpoint, Facts, Operation, SqlMapping, TableVec}
};

/// Runs classification, traversal and matching over one set of facts
pub struct CrudEngine {
    classifier: SqlClassifier,
    resolver:   ReachabilityResolver,
    matcher:    MappingMatcher,
    settings:   EngineConfig
}

impl Default for CrudEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CrudEngine {
    pub fn new(
        classifier: SqlClassifier,
        resolver: ReachabilityResolver,
        matcher: MappingMatcher
    ) -> Self {
        Self {
            classifier,
            resolver,
            matcher,
            settings: EngineConfig::default()
        }
    }

    /// Wire every component from configuration.
    pub fn from_config(config: &Config) -> Self {
        let convention = config.resolver.convention();
        let resolver = ReachabilityResolver::new(convention.clone())
            .with_max_depth(config.resolver.max_depth);
        let matcher = MappingMatcher::with_config(&config.matcher.disabled, convention);
        Self {
            classifier: SqlClassifier::new(config.sql.dialect),
            resolver,
            matcher,
            settings: config.engine.clone()
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineConfig) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.settings.parallel = parallel;
        self
    }

    pub fn classifier(&self) -> &SqlClassifier {
        &self.classifier
    }

    /// Resolve every endpoint of `facts` to CRUD links.
    pub fn run(&self, facts: &Facts) -> EngineReport {
        let mut stats = RunStats::default();

        let (mappings, dropped_mappings) = self.prepare_mappings(&facts.sql_mappings);
        let known: Vec<SqlMapping> = mappings
            .into_iter()
            .filter(|m| {
                let known = m.operation != Operation::Unknown;
                if !known {
                    debug!(mapping = %m.qualified_id(), "mapping has no known operation, skipped");
                }
                known
            })
            .collect();
        stats.mappings_unknown = facts.sql_mappings.len() - dropped_mappings.len() - known.len();
        stats.mappings_dropped = dropped_mappings.len();
        stats.mappings_prepared = known.len();

        let graph = CallGraph::build(&facts.call_edges);
        stats.graph_nodes = graph.node_count();
        stats.graph_edges = graph.edge_count();

        let endpoints: Vec<Endpoint> = facts
            .endpoints
            .iter()
            .filter(|ep| {
                let admitted = self.settings.admits_package(&ep.package_name);
                if !admitted {
                    debug!(endpoint = %ep, package = %ep.package_name, "endpoint filtered out");
                }
                admitted
            })
            .map(normalize_endpoint)
            .collect();
        stats.endpoints_analyzed = endpoints.len();
        stats.endpoints_skipped = facts.endpoints.len() - endpoints.len();

        let per_endpoint: Vec<Option<MatchResult>> = if self.settings.parallel {
            endpoints
                .par_iter()
                .map(|ep| self.analyze_endpoint(&graph, ep, &known))
                .collect()
        } else {
            endpoints
                .iter()
                .map(|ep| self.analyze_endpoint(&graph, ep, &known))
                .collect()
        };

        for tier in self.matcher.tier_names() {
            stats.tier_hits.insert(tier, 0);
        }
        let mut links: Vec<CrudLink> = Vec::new();
        for result in per_endpoint {
            let Some(result) = result else {
                stats.endpoints_without_terminals += 1;
                continue;
            };
            for (tier, hits) in result.tier_hits {
                *stats.tier_hits.entry(tier).or_default() += hits;
            }
            links.extend(result.links);
        }
        stats.count_links(&links);

        info!(
            endpoints = stats.endpoints_analyzed,
            mappings = stats.mappings_prepared,
            links = stats.links,
            tables = stats.distinct_tables,
            endpoints_with_links = stats.endpoints_with_links,
            "CRUD resolution finished"
        );
        if links.is_empty() {
            warn!("no CRUD links produced");
        }

        EngineReport {
            links,
            stats,
            dropped_mappings,
            batch_jobs: facts.batch_jobs.clone()
        }
    }

    /// `None` when the endpoint reaches no data-access identifier.
    fn analyze_endpoint(
        &self,
        graph: &CallGraph,
        endpoint: &Endpoint,
        mappings: &[SqlMapping]
    ) -> Option<MatchResult> {
        let reach = self.resolver.resolve(graph, endpoint);
        if reach.terminals.is_empty() {
            debug!(endpoint = %endpoint, visited = reach.visited, "no data-access layer reached");
            return None;
        }
        Some(
            self.matcher
                .match_endpoint(endpoint, mappings, &reach.terminals)
        )
    }

    fn prepare_mappings(&self, raw: &[SqlMapping]) -> (Vec<SqlMapping>, Vec<DroppedMapping>) {
        let prepared: Vec<AppResult<SqlMapping>> = if self.settings.parallel {
            raw.par_iter().map(|m| self.prepare_mapping(m)).collect()
        } else {
            raw.iter().map(|m| self.prepare_mapping(m)).collect()
        };

        let mut mappings = Vec::with_capacity(prepared.len());
        let mut dropped = Vec::new();
        for (source, outcome) in raw.iter().zip(prepared) {
            match outcome {
                Ok(mapping) => mappings.push(mapping),
                Err(e) => {
                    let id = source.qualified_id();
                    warn!(mapping = %id, error = %e, "mapping dropped");
                    dropped.push(DroppedMapping {
                        mapping: id,
                        reason:  e.to_string()
                    });
                }
            }
        }
        (mappings, dropped)
    }

    /// Fill in the operation and tables from the raw text when missing.
    ///
    /// Supplied values win over classified ones.
    fn prepare_mapping(&self, mapping: &SqlMapping) -> AppResult<SqlMapping> {
        let mut prepared = mapping.clone();
        if prepared.operation == Operation::Unknown || prepared.tables.is_empty() {
            let classification = self.classifier.classify(prepared.raw_text.as_deref())?;
            if prepared.operation == Operation::Unknown {
                prepared.operation = classification.operation;
            }
            if prepared.tables.is_empty() {
                prepared.tables = classification.tables();
            }
        }
        prepared.tables = dedupe_tables(&prepared.tables);
        Ok(prepared)
    }
}

fn normalize_endpoint(endpoint: &Endpoint) -> Endpoint {
    let mut endpoint = endpoint.clone();
    if endpoint
        .http_method
        .chars()
        .any(|c| c.is_ascii_lowercase())
    {
        endpoint.http_method = endpoint.http_method.to_ascii_uppercase().into();
    }
    endpoint
}

fn dedupe_tables(tables: &TableVec) -> TableVec {
    let mut seen = indexmap::IndexSet::with_capacity(tables.len());
    tables
        .iter()
        .filter(|t| !t.is_empty() && seen.insert(t.as_str()))
        .cloned()
        .collect()
}
