//! Mapping matcher: reachable identifiers to CRUD links.
//!
//! Extracted identifiers rarely agree on qualified versus simple naming, so a
//! mapping is tried against an ordered list of [`MatchStrategy`] tiers. The
//! first tier that succeeds wins and no later tier is consulted, which keeps a
//! mapping from producing duplicate links.
//!
//! # Architecture
//!
//! ```text
//!                ┌───────────┐   ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//! mapping ─────▶ │   exact   │──▶│ simple-name │──▶│ loose-suffix │──▶│ containment │
//!                └─────┬─────┘   └──────┬──────┘   └──────┬───────┘   └──────┬──────┘
//!                      └────────────────┴─────────────────┴──────────────────┴──▶ CrudLink per table
//! ```
//!
//! Tiers can be disabled by name through [`MatcherConfig`](crate::config::MatcherConfig):
//!
//! ```toml
//! [matcher]
//! disabled = ["containment"]
//! ```

mod strategies;

use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
pub use strategies::{ExactIdentity, LooseSuffix, RestrictedContainment, SimpleNameIdentity};
use tracing::{debug, trace};

use crate::{
    graph::DataAccessConvention,
    model::{CrudLink, Endpoint, SqlMapping}
};

/// Names of all tiers, in evaluation order
pub const TIER_NAMES: [&str; 4] = ["exact", "simple-name", "loose-suffix", "containment"];

/// One matching tier.
///
/// Strategies are stateless with respect to a single match and must be
/// `Send + Sync` so the engine can share a matcher across worker threads.
pub trait MatchStrategy: Send + Sync {
    /// Stable identifier used in configuration and statistics
    fn name(&self) -> &'static str;

    /// True when `mapping` is considered invoked by the reachable identifiers.
    fn matches(&self, mapping: &SqlMapping, reachable: &IndexSet<CompactString>) -> bool;
}

/// Links produced for one endpoint plus which tiers fired
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub links:     Vec<CrudLink>,
    /// Matched mapping count keyed by tier name
    pub tier_hits: IndexMap<&'static str, usize>
}

/// Ordered tier list evaluated with short-circuit on first success
pub struct MappingMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>
}

impl Default for MappingMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingMatcher {
    /// All four tiers with the default data-access convention
    pub fn new() -> Self {
        Self::with_config::<&str>(&[], DataAccessConvention::default())
    }

    /// Build the tier list, leaving out tiers named in `disabled`.
    pub fn with_config<S: AsRef<str>>(disabled: &[S], convention: DataAccessConvention) -> Self {
        let all: Vec<Box<dyn MatchStrategy>> = vec![
            Box::new(ExactIdentity),
            Box::new(SimpleNameIdentity),
            Box::new(LooseSuffix),
            Box::new(RestrictedContainment::new(convention)),
        ];
        let strategies = all
            .into_iter()
            .filter(|s| {
                !disabled
                    .iter()
                    .any(|d| d.as_ref().eq_ignore_ascii_case(s.name()))
            })
            .collect();
        Self::with_strategies(strategies)
    }

    /// Use an explicit tier list, evaluated in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self {
            strategies
        }
    }

    /// Names of the active tiers in evaluation order
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First tier matching `mapping`, if any.
    pub fn find_tier(
        &self,
        mapping: &SqlMapping,
        reachable: &IndexSet<CompactString>
    ) -> Option<&'static str> {
        self.strategies
            .iter()
            .find(|s| s.matches(mapping, reachable))
            .map(|s| s.name())
    }

    /// Produce the CRUD links of one endpoint.
    ///
    /// Each matched mapping yields one link per distinct table, all sharing
    /// the endpoint and the mapping's CRUD code. Unmatched mappings and
    /// mappings without a CRUD code are skipped.
    pub fn match_endpoint(
        &self,
        endpoint: &Endpoint,
        mappings: &[SqlMapping],
        reachable: &IndexSet<CompactString>
    ) -> MatchResult {
        let mut result = MatchResult::default();
        if reachable.is_empty() {
            return result;
        }

        for mapping in mappings {
            let Some(tier) = self.find_tier(mapping, reachable) else {
                continue;
            };
            trace!(
                endpoint = %endpoint,
                mapping = %mapping.qualified_id(),
                tier,
                "mapping matched"
            );
            *result.tier_hits.entry(tier).or_default() += 1;

            let mut seen: IndexSet<&str> = IndexSet::new();
            for table in &mapping.tables {
                if !seen.insert(table.as_str()) {
                    continue;
                }
                if let Some(link) = CrudLink::derive(endpoint, table, mapping.operation) {
                    result.links.push(link);
                }
            }
        }

        debug!(
            endpoint = %endpoint,
            terminals = reachable.len(),
            links = result.links.len(),
            "endpoint matched"
        );
        result
    }
}
