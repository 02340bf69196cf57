//! Call graph construction and data-access layer detection.
//!
//! The graph is an adjacency map from `{class}#{method}` to the set of
//! identifiers it calls. It is built once per run and only read afterwards,
//! so resolution passes for different endpoints can run concurrently.
//!
//! # Example
//!
//! ```
//! use crud_resolver::{
//!     graph::{CallGraph, DataAccessConvention, ReachabilityResolver},
//!     model::{CallEdge, Endpoint}
//! };
//!
//! let edges = [
//!     CallEdge::new("UserController", "list", "UserService", "findAll"),
//!     CallEdge::new("UserService", "findAll", "UserMapper", "selectAll"),
//! ];
//! let graph = CallGraph::build(&edges);
//! let resolver = ReachabilityResolver::new(DataAccessConvention::default());
//! let endpoint = Endpoint::new("GET", "/users", "UserController", "list", "com.example");
//!
//! let reach = resolver.resolve(&graph, &endpoint);
//! assert!(reach.terminals.contains("UserMapper#selectAll"));
//! ```

mod resolve;

use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

pub use resolve::{Reachability, ReachabilityResolver};

use crate::model::CallEdge;

/// Class-name suffixes that mark the data-access layer by default
pub const DEFAULT_DATA_ACCESS_SUFFIXES: [&str; 3] = ["Mapper", "Repository", "Dao"];

/// Naming convention deciding which classes are data-access terminals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAccessConvention {
    suffixes: Vec<CompactString>
}

impl Default for DataAccessConvention {
    fn default() -> Self {
        Self::with_suffixes(DEFAULT_DATA_ACCESS_SUFFIXES)
    }
}

impl DataAccessConvention {
    pub fn with_suffixes<S: AsRef<str>>(suffixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| CompactString::from(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect()
        }
    }

    pub fn suffixes(&self) -> &[CompactString] {
        &self.suffixes
    }

    /// True when the class name ends with one of the configured suffixes.
    pub fn is_data_access(&self, class_name: &str) -> bool {
        self.suffixes
            .iter()
            .any(|suffix| class_name.ends_with(suffix.as_str()))
    }
}

/// Adjacency map keyed by `{class}#{method}`
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    adjacency:  IndexMap<CompactString, IndexSet<CompactString>>,
    edge_count: usize
}

impl CallGraph {
    /// Build the adjacency map in one pass over the edges.
    ///
    /// Duplicate edges collapse; insertion order is preserved so traversal
    /// and output are deterministic.
    pub fn build(edges: &[CallEdge]) -> Self {
        let mut adjacency: IndexMap<CompactString, IndexSet<CompactString>> = IndexMap::new();
        let mut edge_count = 0;
        for edge in edges {
            let from = edge.from_id();
            let to = edge.to_id();
            trace!(%from, %to, "call edge");
            if adjacency.entry(from).or_default().insert(to) {
                edge_count += 1;
            }
        }
        debug!(
            edges = edges.len(),
            distinct_edges = edge_count,
            callers = adjacency.len(),
            "call graph built"
        );
        Self {
            adjacency,
            edge_count
        }
    }

    /// Identifiers called directly by `id`.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &CompactString> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// Number of identifiers with at least one outgoing edge
    pub fn caller_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct identifiers appearing on either end of an edge
    pub fn node_count(&self) -> usize {
        let mut nodes: IndexSet<&str> = self.adjacency.keys().map(|k| k.as_str()).collect();
        for targets in self.adjacency.values() {
            nodes.extend(targets.iter().map(|t| t.as_str()));
        }
        nodes.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
