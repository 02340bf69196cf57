mod set_expr;
mod table;

use compact_str::CompactString;
use indexmap::IndexSet;
pub use set_expr::extract_from_set_expr;
pub use table::{
    extract_from_table_with_joins, normalize_table_name, relation_alias, relation_name
};

/// Tables collected while walking a statement, in discovery order
pub type TableSet = IndexSet<CompactString>;
