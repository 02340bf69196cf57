//! Run report types.

use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::model::{BatchJob, CrudLink};

/// A mapping removed before matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedMapping {
    /// `{owner}#{operationId}` of the mapping
    pub mapping: CompactString,
    pub reason:  String
}

/// Run-level counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Endpoints that passed the package filter and were traversed
    pub endpoints_analyzed:          usize,
    /// Endpoints removed by the package filter
    pub endpoints_skipped:           usize,
    /// Traversed endpoints that reached no data-access identifier
    pub endpoints_without_terminals: usize,
    /// Distinct endpoints with at least one link
    pub endpoints_with_links:        usize,
    /// Distinct tables across all links
    pub distinct_tables:             usize,
    pub links:                       usize,
    /// Mappings that entered matching
    pub mappings_prepared:           usize,
    /// Mappings whose classification failed
    pub mappings_dropped:            usize,
    /// Mappings left without a known operation
    pub mappings_unknown:            usize,
    pub graph_nodes:                 usize,
    pub graph_edges:                 usize,
    /// Matched mapping count per tier name, in tier order
    pub tier_hits:                   IndexMap<&'static str, usize>
}

impl RunStats {
    /// Fill the link-derived counters from the final link list.
    pub(crate) fn count_links(&mut self, links: &[CrudLink]) {
        let tables: IndexSet<&str> = links.iter().map(|l| l.table()).collect();
        let endpoints: IndexSet<_> = links.iter().map(|l| l.endpoint()).collect();
        self.links = links.len();
        self.distinct_tables = tables.len();
        self.endpoints_with_links = endpoints.len();
    }
}

/// Everything one engine run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineReport {
    pub links:            Vec<CrudLink>,
    pub stats:            RunStats,
    pub dropped_mappings: Vec<DroppedMapping>,
    /// Scheduled entry points, reported but never traversed
    pub batch_jobs:       Vec<BatchJob>
}

impl EngineReport {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Distinct tables in first-seen order
    pub fn tables(&self) -> Vec<&str> {
        let tables: IndexSet<&str> = self.links.iter().map(|l| l.table()).collect();
        tables.into_iter().collect()
    }
}
