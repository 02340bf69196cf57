use compact_str::CompactString;
use indexmap::IndexSet;
use serde::Serialize;

use crate::model::{Operation, TableVec};

/// Which stage of the classification pipeline produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum ClassificationStage {
    /// Empty or whitespace-only text; nothing to parse
    Empty,
    /// Parsed by sqlparser; tables from whole-statement relation extraction
    Structured,
    /// Parsed by sqlparser; tables from walking the query shape
    ShapeWalk,
    /// Parsed by sqlparser; tables from FROM/JOIN keyword matching
    KeywordRegex,
    /// Not parseable; operation sniffed from keywords in the raw text
    Fallback
}

impl std::fmt::Display for ClassificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Structured => write!(f, "structured"),
            Self::ShapeWalk => write!(f, "shape-walk"),
            Self::KeywordRegex => write!(f, "keyword-regex"),
            Self::Fallback => write!(f, "fallback")
        }
    }
}

/// Operation and tables extracted from one SQL text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub operation:        Operation,
    /// Tables written by INSERT/UPDATE/DELETE
    pub target_tables:    TableVec,
    /// Tables only read (SELECT sources, JOIN targets, INSERT ... SELECT)
    pub reference_tables: TableVec,
    pub stage:            ClassificationStage
}

impl Classification {
    pub fn new(operation: Operation, stage: ClassificationStage) -> Self {
        Self {
            operation,
            target_tables: TableVec::new(),
            reference_tables: TableVec::new(),
            stage
        }
    }

    /// Result for empty input: a table-less SELECT.
    pub fn empty() -> Self {
        Self::new(Operation::Select, ClassificationStage::Empty)
    }

    /// Targets followed by references, de-duplicated by first occurrence.
    pub fn tables(&self) -> TableVec {
        let merged: IndexSet<&CompactString> = self
            .target_tables
            .iter()
            .chain(self.reference_tables.iter())
            .collect();
        merged.into_iter().cloned().collect()
    }
}

/// Outcome of one "try, else degrade" pipeline stage
#[derive(Debug)]
pub enum StageOutcome<T> {
    /// The stage produced a usable result
    Resolved(T),
    /// The stage could not decide; the next stage should run
    Degrade(String)
}

impl<T> StageOutcome<T> {
    /// Run `next` only when this stage degraded.
    pub fn or_else(self, next: impl FnOnce(String) -> StageOutcome<T>) -> StageOutcome<T> {
        match self {
            Self::Resolved(value) => Self::Resolved(value),
            Self::Degrade(reason) => next(reason)
        }
    }
}
