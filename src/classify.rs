//! SQL classification: raw mapping text to an operation and table set.
//!
//! Classification never fails on present input. Text flows through a
//! pipeline of "try, else degrade" stages, each returning a
//! [`StageOutcome`]:
//!
//! ```text
//! raw ──▶ preprocess ──▶ parse ──▶ per-statement extraction ──▶ Classification
//!             │            │
//!             └────────────┴──────▶ keyword fallback ─────────▶ Classification
//! ```
//!
//! SELECT table extraction degrades the same way internally: whole-statement
//! relation visiting, then walking the query shape, then FROM/JOIN keyword
//! matching over the repaired text.
//!
//! # Example
//!
//! ```
//! use crud_resolver::{
//!     classify::{SqlClassifier, SqlDialect},
//!     model::Operation
//! };
//!
//! let classifier = SqlClassifier::new(SqlDialect::Generic);
//! let result = classifier.classify_text("DELETE FROM users WHERE id = #{id}");
//!
//! assert_eq!(result.operation, Operation::Delete);
//! assert_eq!(result.tables().as_slice(), ["users"]);
//! ```

mod extract;
mod fallback;
mod types;

use std::{ops::ControlFlow, sync::RwLock};

use compact_str::CompactString;
use serde::Deserialize;
use sqlparser::{
    ast::{FromTable, Query, SetExpr, Statement, visit_relations},
    dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect},
    parser::Parser
};
use tracing::{debug, trace, warn};
pub use types::{Classification, ClassificationStage, StageOutcome};

use self::extract::{
    TableSet, extract_from_set_expr, extract_from_table_with_joins, relation_alias, relation_name
};
use crate::{
    cache::ClassificationCache,
    error::{AppResult, absent_sql_error, sql_parse_error},
    model::{Operation, TableVec},
    preprocessor::Preprocessor
};

/// Default number of distinct texts remembered per classifier
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {})
        }
    }

    /// Lenient lookup used for environment overrides
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generic" => Some(Self::Generic),
            "mysql" => Some(Self::MySQL),
            "postgresql" | "postgres" => Some(Self::PostgreSQL),
            "sqlite" => Some(Self::SQLite),
            _ => None
        }
    }
}

/// Classifies SQL-like mapping text.
///
/// Safe to share across worker threads; each classifier owns its cache.
pub struct SqlClassifier {
    dialect:      SqlDialect,
    preprocessor: Preprocessor,
    cache:        RwLock<ClassificationCache>
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new(SqlDialect::default())
    }
}

impl SqlClassifier {
    pub fn new(dialect: SqlDialect) -> Self {
        Self::with_cache_capacity(dialect, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(dialect: SqlDialect, capacity: usize) -> Self {
        Self {
            dialect,
            preprocessor: Preprocessor::new(),
            cache: RwLock::new(ClassificationCache::new(capacity))
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Classify possibly-absent text.
    ///
    /// # Errors
    ///
    /// Returns a bad-request error when `raw` is `None`. Present text always
    /// classifies.
    pub fn classify(&self, raw: Option<&str>) -> AppResult<Classification> {
        let raw = raw.ok_or_else(absent_sql_error)?;
        Ok(self.classify_text(raw))
    }

    /// Classify text. Empty or whitespace-only text is a table-less SELECT.
    pub fn classify_text(&self, raw: &str) -> Classification {
        if raw.trim().is_empty() {
            return Classification::empty();
        }
        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(raw)
        {
            trace!("classification cache hit");
            return hit;
        }

        let result = self.run_pipeline(raw);
        debug!(
            sql = %preview(raw),
            operation = %result.operation,
            stage = %result.stage,
            tables = result.target_tables.len() + result.reference_tables.len(),
            "classified SQL"
        );
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(raw, result.clone());
        }
        result
    }

    fn run_pipeline(&self, raw: &str) -> Classification {
        let preprocessed = self.preprocessor.process(raw);
        if !preprocessed.metadata.repairs.is_empty() {
            trace!(repairs = ?preprocessed.metadata.repairs, "repaired SQL fragments");
        }

        let outcome = if preprocessed.is_placeholder() {
            StageOutcome::Degrade("text failed structural validation".to_string())
        } else {
            self.parse_structured(&preprocessed.sql)
        };

        match outcome {
            StageOutcome::Resolved(result) => result,
            StageOutcome::Degrade(reason) => {
                debug!(%reason, "using keyword fallback");
                fallback::classify(raw)
            }
        }
    }

    fn parse_structured(&self, sql: &str) -> StageOutcome<Classification> {
        let dialect = self.dialect.into_parser_dialect();
        let statements = match Parser::parse_sql(dialect.as_ref(), sql) {
            Ok(statements) => statements,
            Err(e) => return StageOutcome::Degrade(sql_parse_error(e.to_string()).to_string())
        };
        match statements.first() {
            Some(stmt) => StageOutcome::Resolved(classify_statement(stmt, sql)),
            None => StageOutcome::Degrade("no statement found".to_string())
        }
    }
}

fn classify_statement(stmt: &Statement, sql: &str) -> Classification {
    match stmt {
        Statement::Query(query) => match query.body.as_ref() {
            SetExpr::Insert(inner) | SetExpr::Update(inner) | SetExpr::Delete(inner) => {
                let mut result = classify_statement(inner, sql);
                let mut excluded = cte_names(query);
                let mut references: TableSet = result
                    .reference_tables
                    .iter()
                    .filter(|t| !excluded.contains(t))
                    .cloned()
                    .collect();
                excluded.extend(result.target_tables.iter().cloned());
                references.extend(references_excluding(stmt, &excluded));
                result.reference_tables = references.into_iter().collect();
                result
            }
            _ => classify_select(stmt, query, sql)
        },
        Statement::Insert(insert) => {
            let mut result = Classification::new(Operation::Insert, ClassificationStage::Structured);
            let target = extract::normalize_table_name(&insert.table.to_string());
            result.reference_tables = references_excluding(stmt, std::slice::from_ref(&target));
            result.target_tables.push(target);
            result
        }
        Statement::Update(update) => {
            let mut result = Classification::new(Operation::Update, ClassificationStage::Structured);
            match relation_name(&update.table.relation) {
                Some(target) => {
                    result.reference_tables =
                        references_excluding(stmt, std::slice::from_ref(&target));
                    result.target_tables.push(target);
                }
                None => {
                    warn!(sql = %preview(sql), "UPDATE without a resolvable target table");
                    result.reference_tables = references_excluding(stmt, &[]);
                }
            }
            result
        }
        Statement::Delete(delete) => {
            let mut result = Classification::new(Operation::Delete, ClassificationStage::Structured);
            let from_items = match &delete.from {
                FromTable::WithFromKeyword(items) | FromTable::WithoutKeyword(items) => items
            };

            let mut aliases: Vec<(CompactString, CompactString)> = Vec::new();
            for item in from_items {
                let factors =
                    std::iter::once(&item.relation).chain(item.joins.iter().map(|j| &j.relation));
                for factor in factors {
                    if let (Some(alias), Some(name)) = (relation_alias(factor), relation_name(factor)) {
                        aliases.push((alias, name));
                    }
                }
            }

            let mut targets = TableSet::new();
            if delete.tables.is_empty() {
                targets.extend(from_items.iter().filter_map(|item| relation_name(&item.relation)));
            } else {
                for name in &delete.tables {
                    let name = extract::normalize_table_name(&name.to_string());
                    let resolved = aliases
                        .iter()
                        .find(|(alias, _)| *alias == name)
                        .map_or(name, |(_, table)| table.clone());
                    targets.insert(resolved);
                }
            }

            let mut excluded: Vec<CompactString> = targets.iter().cloned().collect();
            excluded.extend(aliases.into_iter().map(|(alias, _)| alias));
            result.reference_tables = references_excluding(stmt, &excluded);
            result.target_tables = targets.into_iter().collect();
            result
        }
        other => {
            warn!(
                kind = %statement_kind(other),
                "unrecognized statement shape"
            );
            Classification::new(Operation::Unknown, ClassificationStage::Structured)
        }
    }
}

/// Names bound by the query's `WITH` clause.
fn cte_names(query: &Query) -> Vec<CompactString> {
    query
        .with
        .iter()
        .flat_map(|w| &w.cte_tables)
        .map(|cte| extract::normalize_table_name(&cte.alias.name.value))
        .collect()
}

fn classify_select(stmt: &Statement, query: &Query, sql: &str) -> Classification {
    let ctes = cte_names(query);

    let outcome = whole_statement_tables(stmt, &ctes)
        .or_else(|reason| {
            trace!(%reason, "whole-statement extraction empty, walking query shape");
            let mut tables = TableSet::new();
            extract_from_set_expr(&query.body, &mut tables);
            tables.retain(|t| !ctes.contains(t));
            non_empty(tables, ClassificationStage::ShapeWalk, "query shape has no tables")
        })
        .or_else(|reason| {
            trace!(%reason, "shape walk empty, matching FROM/JOIN keywords");
            let tables = fallback::select_tables_by_keyword(sql);
            non_empty(tables, ClassificationStage::KeywordRegex, "no FROM/JOIN keywords")
        });

    match outcome {
        StageOutcome::Resolved((tables, stage)) => {
            let mut result = Classification::new(Operation::Select, stage);
            result.reference_tables = tables.into_iter().collect();
            result
        }
        StageOutcome::Degrade(_) => {
            Classification::new(Operation::Select, ClassificationStage::Structured)
        }
    }
}

fn whole_statement_tables(
    stmt: &Statement,
    cte_names: &[CompactString]
) -> StageOutcome<(TableSet, ClassificationStage)> {
    let mut tables = all_relations(stmt);
    tables.retain(|t| !cte_names.contains(t));
    non_empty(tables, ClassificationStage::Structured, "statement references no relations")
}

fn non_empty(
    tables: TableSet,
    stage: ClassificationStage,
    reason: &str
) -> StageOutcome<(TableSet, ClassificationStage)> {
    if tables.is_empty() {
        StageOutcome::Degrade(reason.to_string())
    } else {
        StageOutcome::Resolved((tables, stage))
    }
}

/// Every relation the statement references, in visit order.
fn all_relations(stmt: &Statement) -> TableSet {
    let mut tables = TableSet::new();
    let _ = visit_relations(stmt, |name| {
        tables.insert(extract::normalize_table_name(&name.to_string()));
        ControlFlow::<()>::Continue(())
    });
    tables
}

fn references_excluding(stmt: &Statement, excluded: &[CompactString]) -> TableVec {
    let mut tables = all_relations(stmt);
    if let Statement::Update(update) = stmt {
        extract_from_table_with_joins(&update.table, &mut tables);
    }
    tables
        .into_iter()
        .filter(|t| !excluded.contains(t))
        .collect()
}

fn statement_kind(stmt: &Statement) -> String {
    let text = stmt.to_string();
    text.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// First 50 characters of the text, for log lines.
fn preview(raw: &str) -> String {
    let collapsed: String = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(50) {
        Some((idx, _)) => format!("{}...", &collapsed[..idx]),
        None => collapsed
    }
}
