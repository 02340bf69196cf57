use std::collections::VecDeque;

use compact_str::CompactString;
use indexmap::IndexSet;
use tracing::{debug, trace};

use super::{CallGraph, DataAccessConvention};
use crate::model::{Endpoint, split_method_id};

/// Result of one endpoint's traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    /// Reachable data-access identifiers, in discovery order
    pub terminals: IndexSet<CompactString>,
    /// Number of identifiers discovered, the entry point included
    pub visited:   usize,
    /// True when `max_depth` stopped expansion before the frontier emptied
    pub truncated: bool
}

/// Breadth-first search from an endpoint to the data-access layer.
///
/// Every discovered identifier is classified by its class-name suffix:
/// data-access identifiers are recorded as terminals, all others are
/// intermediates. Both kinds are expanded; terminal status never prunes the
/// traversal. Each call owns its visited set, so one resolver can serve many
/// endpoints concurrently.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityResolver {
    convention: DataAccessConvention,
    max_depth:  Option<usize>
}

impl ReachabilityResolver {
    pub fn new(convention: DataAccessConvention) -> Self {
        Self {
            convention,
            max_depth: None
        }
    }

    /// Limit expansion to `depth` calls away from the entry point.
    ///
    /// `0` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = (depth > 0).then_some(depth);
        self
    }

    pub fn convention(&self) -> &DataAccessConvention {
        &self.convention
    }

    /// Compute the terminal identifiers reachable from `endpoint`.
    pub fn resolve(&self, graph: &CallGraph, endpoint: &Endpoint) -> Reachability {
        let start = endpoint.entry_id();
        debug!(entry = %start, "reachability search started");

        let mut visited: IndexSet<CompactString> = IndexSet::new();
        let mut queue: VecDeque<(CompactString, usize)> = VecDeque::new();
        let mut terminals = IndexSet::new();
        let mut truncated = false;

        visited.insert(start.clone());
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if self.max_depth.is_some_and(|max| depth >= max) {
                if graph.successors(&current).next().is_some() {
                    truncated = true;
                }
                continue;
            }
            for next in graph.successors(&current) {
                if !visited.insert(next.clone()) {
                    continue;
                }
                let (class, _) = split_method_id(next);
                if self.convention.is_data_access(class) {
                    trace!(from = %current, to = %next, "data-access layer reached");
                    terminals.insert(next.clone());
                } else {
                    trace!(from = %current, to = %next, "intermediate layer");
                }
                queue.push_back((next.clone(), depth + 1));
            }
        }

        debug!(
            entry = %endpoint.entry_id(),
            visited = visited.len(),
            terminals = terminals.len(),
            truncated,
            "reachability search finished"
        );
        Reachability {
            terminals,
            visited: visited.len(),
            truncated
        }
    }
}
