//! The four matching tiers, from most to least precise.

use compact_str::CompactString;
use indexmap::IndexSet;

use super::MatchStrategy;
use crate::{
    graph::DataAccessConvention,
    model::{SqlMapping, method_id, split_method_id}
};

/// Tier 1: `{owner}#{operationId}` is reachable as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactIdentity;

impl MatchStrategy for ExactIdentity {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, mapping: &SqlMapping, reachable: &IndexSet<CompactString>) -> bool {
        reachable.contains(mapping.qualified_id().as_str())
    }
}

/// Tier 2: the owner with its package qualifier stripped is reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNameIdentity;

impl MatchStrategy for SimpleNameIdentity {
    fn name(&self) -> &'static str {
        "simple-name"
    }

    fn matches(&self, mapping: &SqlMapping, reachable: &IndexSet<CompactString>) -> bool {
        let id = method_id(mapping.simple_owner(), &mapping.operation_id);
        reachable.contains(id.as_str())
    }
}

/// Tier 3: a reachable class contains the simple owner name and the method
/// equals the operation id.
///
/// An empty owner matches any class, so only the method must agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LooseSuffix;

impl MatchStrategy for LooseSuffix {
    fn name(&self) -> &'static str {
        "loose-suffix"
    }

    fn matches(&self, mapping: &SqlMapping, reachable: &IndexSet<CompactString>) -> bool {
        let owner = mapping.simple_owner();
        reachable.iter().any(|id| {
            let (class, method) = split_method_id(id);
            class.contains(owner) && method == mapping.operation_id.as_str()
        })
    }
}

/// Tier 4: the owner follows the data-access naming convention and a
/// reachable class contains its simple name, whatever the method.
///
/// Known false-positive source: any reachable method of a matching class
/// pulls in every operation the owner declares.
#[derive(Debug, Clone, Default)]
pub struct RestrictedContainment {
    convention: DataAccessConvention
}

impl RestrictedContainment {
    pub fn new(convention: DataAccessConvention) -> Self {
        Self {
            convention
        }
    }
}

impl MatchStrategy for RestrictedContainment {
    fn name(&self) -> &'static str {
        "containment"
    }

    fn matches(&self, mapping: &SqlMapping, reachable: &IndexSet<CompactString>) -> bool {
        let owner = mapping.simple_owner();
        if !self.convention.is_data_access(owner) {
            return false;
        }
        reachable
            .iter()
            .any(|id| split_method_id(id).0.contains(owner))
    }
}
