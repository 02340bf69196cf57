use compact_str::CompactString;
use sqlparser::ast::{ObjectName, TableFactor, TableWithJoins};

use super::{TableSet, set_expr::extract_from_set_expr};

/// Strip quoting and schema qualification from a table reference.
///
/// `` `db`.`user_table` `` becomes `user_table`.
pub fn normalize_table_name(raw: &str) -> CompactString {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    last.chars()
        .filter(|c| !matches!(c, '`' | '"' | '\'' | '[' | ']'))
        .collect()
}

fn object_table_name(name: &ObjectName) -> CompactString {
    normalize_table_name(&name.to_string())
}

/// Name of the table a factor refers to, if it is a plain table.
pub fn relation_name(table_factor: &TableFactor) -> Option<CompactString> {
    match table_factor {
        TableFactor::Table {
            name, ..
        } => Some(object_table_name(name)),
        _ => None
    }
}

/// Alias given to a plain table factor (`users u` yields `u`).
pub fn relation_alias(table_factor: &TableFactor) -> Option<CompactString> {
    match table_factor {
        TableFactor::Table {
            alias: Some(alias),
            ..
        } => Some(alias.name.value.as_str().into()),
        _ => None
    }
}

pub fn extract_from_table_factor(table_factor: &TableFactor, tables: &mut TableSet) {
    match table_factor {
        TableFactor::Table {
            name, ..
        } => {
            tables.insert(object_table_name(name));
        }
        TableFactor::Derived {
            subquery, ..
        } => {
            extract_from_set_expr(&subquery.body, tables);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            extract_from_table_with_joins(table_with_joins, tables);
        }
        _ => {}
    }
}

/// FROM item plus every JOIN target hanging off it.
pub fn extract_from_table_with_joins(table_with_joins: &TableWithJoins, tables: &mut TableSet) {
    extract_from_table_factor(&table_with_joins.relation, tables);
    for join in &table_with_joins.joins {
        extract_from_table_factor(&join.relation, tables);
    }
}
