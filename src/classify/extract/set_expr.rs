use sqlparser::ast::SetExpr;

use super::{TableSet, table::extract_from_table_with_joins};

/// Collect tables by walking the shape of a query body.
///
/// - plain query: FROM items and their JOIN targets
/// - set operation (`UNION`, `INTERSECT`, `EXCEPT`): both branches
/// - parenthesized query: the inner body
pub fn extract_from_set_expr(set_expr: &SetExpr, tables: &mut TableSet) {
    match set_expr {
        SetExpr::Select(select) => {
            for table in &select.from {
                extract_from_table_with_joins(table, tables);
            }
        }
        SetExpr::SetOperation {
            left,
            right,
            ..
        } => {
            extract_from_set_expr(left, tables);
            extract_from_set_expr(right, tables);
        }
        SetExpr::Query(query) => {
            extract_from_set_expr(&query.body, tables);
        }
        _ => {}
    }
}
