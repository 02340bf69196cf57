//! Regex-only classification for text the parser cannot handle.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    extract::{TableSet, normalize_table_name},
    types::{Classification, ClassificationStage}
};
use crate::model::Operation;

/// Source tables of a SELECT (FROM / JOIN targets).
static SELECT_SOURCE_REGEXES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?im)\bFROM\s+([`"']?\w+[`"']?)"#).expect("valid regex"),
        Regex::new(r#"(?im)\bJOIN\s+([`"']?\w+[`"']?)"#).expect("valid regex")
    ]
});

static FROM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)\bFROM\s+([`"']?\w+[`"']?)"#).expect("valid regex"));

static INSERT_TARGET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)\bINSERT\s+INTO\s+([`"']?\w+[`"']?)"#).expect("valid regex")
});

static UPDATE_TARGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)\bUPDATE\s+([`"']?\w+[`"']?)"#).expect("valid regex"));

static DELETE_TARGET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)\bDELETE\s+FROM\s+([`"']?\w+[`"']?)"#).expect("valid regex")
});

/// Extract SELECT source tables by keyword matching.
pub fn select_tables_by_keyword(sql: &str) -> TableSet {
    collect_tables(sql, SELECT_SOURCE_REGEXES.iter())
}

/// Classify text by keyword sniffing alone.
///
/// The operation is the first of INSERT, UPDATE, DELETE found in the
/// upper-cased text, SELECT otherwise. Tables are everything following FROM,
/// INSERT INTO or UPDATE, unquoted and de-duplicated by first occurrence.
/// Targets are the tables named by the operation's own keyword (`INSERT INTO`,
/// `UPDATE`, `DELETE FROM`); every other table is a reference.
pub fn classify(raw: &str) -> Classification {
    let upper = raw.to_uppercase();
    let operation = if upper.contains("INSERT ") {
        Operation::Insert
    } else if upper.contains("UPDATE ") {
        Operation::Update
    } else if upper.contains("DELETE ") {
        Operation::Delete
    } else {
        Operation::Select
    };

    let target_regex = match operation {
        Operation::Insert => Some(&*INSERT_TARGET_REGEX),
        Operation::Update => Some(&*UPDATE_TARGET_REGEX),
        Operation::Delete => Some(&*DELETE_TARGET_REGEX),
        _ => None
    };
    let targets = collect_tables(raw, target_regex.into_iter());
    let references = collect_tables(
        raw,
        [&*FROM_REGEX, &*INSERT_TARGET_REGEX, &*UPDATE_TARGET_REGEX].into_iter()
    );

    let mut result = Classification::new(operation, ClassificationStage::Fallback);
    result.reference_tables = references
        .into_iter()
        .filter(|t| !targets.contains(t))
        .collect();
    result.target_tables = targets.into_iter().collect();
    result
}

fn collect_tables<'a>(sql: &str, patterns: impl Iterator<Item = &'a Regex>) -> TableSet {
    let mut tables = TableSet::new();
    for pattern in patterns {
        for caps in pattern.captures_iter(sql) {
            let name = normalize_table_name(&caps[1]);
            if !name.is_empty() {
                tables.insert(name);
            }
        }
    }
    tables
}
