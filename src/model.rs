//! Fact model shared by every stage of the resolver.
//!
//! Facts are produced by external extractors (controller scanners, call graph
//! scanners, SQL mapping scanners) and are immutable once handed to the
//! engine. Call graph nodes are identified by `{class}#{method}` strings; see
//! [`method_id`] and [`split_method_id`].

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Table list of a single mapping or classification (typically < 4 entries)
pub type TableVec = SmallVec<[CompactString; 4]>;

/// Build a call graph identifier from class and method names.
pub fn method_id(class: &str, method: &str) -> CompactString {
    format_compact!("{}#{}", class, method)
}

/// Split a `{class}#{method}` identifier.
///
/// Identifiers without a separator are treated as a bare class with an empty
/// method.
pub fn split_method_id(id: &str) -> (&str, &str) {
    id.split_once('#').unwrap_or((id, ""))
}

/// Strip the package qualifier from a class name.
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit_once('.')
        .map_or(qualified, |(_, simple)| simple)
}

/// Kind of SQL operation a mapping performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    #[serde(other)]
    Unknown
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN"
        }
    }

    /// Lenient, case-insensitive lookup; anything unrecognised is `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            _ => Self::Unknown
        }
    }

    /// Single-letter CRUD code: the upper-cased first letter of the operation.
    ///
    /// `Unknown` has no code because its first letter would collide with
    /// `UPDATE`.
    pub fn crud_code(&self) -> Option<char> {
        match self {
            Self::Unknown => None,
            known => known.as_str().chars().next().map(|c| c.to_ascii_uppercase())
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callable entry point exposed by the analysed service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub http_method:  CompactString,
    pub url_path:     CompactString,
    pub entry_class:  CompactString,
    pub entry_method: CompactString,
    #[serde(default)]
    pub package_name: CompactString
}

impl Endpoint {
    pub fn new(
        http_method: &str,
        url_path: &str,
        entry_class: &str,
        entry_method: &str,
        package_name: &str
    ) -> Self {
        Self {
            http_method:  http_method.to_ascii_uppercase().into(),
            url_path:     url_path.into(),
            entry_class:  entry_class.into(),
            entry_method: entry_method.into(),
            package_name: package_name.into()
        }
    }

    /// Traversal identity of this endpoint
    pub fn entry_id(&self) -> CompactString {
        method_id(&self.entry_class, &self.entry_method)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}#{})",
            self.http_method, self.url_path, self.entry_class, self.entry_method
        )
    }
}

/// Directed fact "method `from` invokes method `to`"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub from_class:  CompactString,
    pub from_method: CompactString,
    pub to_class:    CompactString,
    pub to_method:   CompactString
}

impl CallEdge {
    pub fn new(from_class: &str, from_method: &str, to_class: &str, to_method: &str) -> Self {
        Self {
            from_class:  from_class.into(),
            from_method: from_method.into(),
            to_class:    to_class.into(),
            to_method:   to_method.into()
        }
    }

    pub fn from_id(&self) -> CompactString {
        method_id(&self.from_class, &self.from_method)
    }

    pub fn to_id(&self) -> CompactString {
        method_id(&self.to_class, &self.to_method)
    }
}

/// A declared, named SQL operation and the mapping unit that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlMapping {
    /// Qualified name of the declaring mapping unit (may be empty)
    #[serde(default)]
    pub owner:        CompactString,
    #[serde(default)]
    pub operation_id: CompactString,
    #[serde(default = "unknown_operation")]
    pub operation:    Operation,
    /// Raw SQL-like text; absent for mappings recovered without a body
    #[serde(default)]
    pub raw_text:     Option<String>,
    #[serde(default)]
    pub tables:       TableVec
}

fn unknown_operation() -> Operation {
    Operation::Unknown
}

impl SqlMapping {
    pub fn new(
        owner: &str,
        operation_id: &str,
        operation: Operation,
        raw_text: Option<&str>,
        tables: &[&str]
    ) -> Self {
        Self {
            owner: owner.into(),
            operation_id: operation_id.into(),
            operation,
            raw_text: raw_text.map(String::from),
            tables: tables.iter().map(|t| CompactString::from(*t)).collect()
        }
    }

    /// `{owner}#{operation_id}`
    pub fn qualified_id(&self) -> CompactString {
        method_id(&self.owner, &self.operation_id)
    }

    /// Owner name without its package qualifier
    pub fn simple_owner(&self) -> &str {
        simple_name(&self.owner)
    }
}

/// One (endpoint, table, operation-code) output fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CrudLink {
    endpoint:  Endpoint,
    table:     CompactString,
    crud_code: char
}

impl CrudLink {
    /// Derive a link from the operation of the matched mapping.
    ///
    /// Returns `None` for [`Operation::Unknown`].
    pub fn derive(endpoint: &Endpoint, table: &str, operation: Operation) -> Option<Self> {
        let crud_code = operation.crud_code()?;
        Some(Self {
            endpoint: endpoint.clone(),
            table: table.into(),
            crud_code
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn crud_code(&self) -> char {
        self.crud_code
    }
}

/// Scheduled entry point. Reported alongside results, never traversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchJob {
    pub class_name:   CompactString,
    pub job_name:     CompactString,
    #[serde(default)]
    pub package_name: CompactString
}

impl BatchJob {
    pub fn new(class_name: &str, job_name: &str, package_name: &str) -> Self {
        Self {
            class_name:   class_name.into(),
            job_name:     job_name.into(),
            package_name: package_name.into()
        }
    }
}

/// Everything the extractors hand to the engine for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facts {
    #[serde(default)]
    pub endpoints:    Vec<Endpoint>,
    #[serde(default, alias = "calls")]
    pub call_edges:   Vec<CallEdge>,
    #[serde(default, alias = "sqls")]
    pub sql_mappings: Vec<SqlMapping>,
    #[serde(default)]
    pub batch_jobs:   Vec<BatchJob>
}
