//! Type conversion functions for CLI to internal types.

use crate::{
    classify::SqlDialect,
    cli::{Dialect, Format},
    output::OutputFormat
};

/// Converts a CLI dialect enum to the internal SQL dialect type.
///
/// # Example
///
/// ```
/// use crud_resolver::{app::convert_dialect, classify::SqlDialect, cli::Dialect};
///
/// assert_eq!(convert_dialect(Dialect::Mysql), SqlDialect::MySQL);
/// ```
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite
    }
}

/// Converts a CLI format enum to the internal output format type.
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
