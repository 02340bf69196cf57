//! Template-aware SQL preprocessing.
//!
//! SQL declared in mapping files is rarely parseable as written: it carries
//! parameter placeholders (`#{id}`, `${table}`), dynamic tags (`<if>`,
//! `<where>`, `<foreach>`), CDATA markers and XML entities. This module turns
//! such text into something `sqlparser` can read, without executing the
//! template.
//!
//! # Architecture
//!
//! The preprocessor operates in three phases:
//! 1. **Normalization** ([`template`]): placeholders become literals, tags are
//!    stripped, whitespace is collapsed
//! 2. **Repair** ([`repair`]): fragments broken by tag removal are patched
//!    (dangling `AND`, empty `WHERE`, bare `FROM ...`)
//! 3. **Validation**: anything that still does not look like a DML statement
//!    is replaced with [`PLACEHOLDER_SQL`] so the parser never sees garbage
//!
//! # Example
//!
//! ```
//! use crud_resolver::preprocessor::Preprocessor;
//!
//! let sql = "SELECT * FROM users <where><if test=\"id != null\">AND id = #{id}</if></where>";
//! let result = Preprocessor::new().process(sql);
//!
//! assert_eq!(result.sql, "SELECT * FROM users WHERE id = 1");
//! assert!(!result.is_placeholder());
//! assert_eq!(result.metadata.placeholders, 1);
//! ```

pub mod repair;
pub mod template;

use std::sync::LazyLock;

use regex::Regex;

/// Statement substituted for text that fails structural validation.
pub const PLACEHOLDER_SQL: &str = "SELECT 1";

static STATEMENT_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:WITH|SELECT|INSERT|UPDATE|DELETE)\s").expect("valid regex")
});

static DANGLING_CLAUSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(?:WHERE|FROM|SET)$").expect("valid regex"));

/// Preprocessor for templated SQL text.
#[derive(Debug, Default, Clone, Copy)]
pub struct Preprocessor;

/// Metadata collected during preprocessing.
#[derive(Debug, Default, Clone)]
pub struct PreprocessorMetadata {
    /// Number of `#{...}` / `${...}` placeholders replaced
    pub placeholders:  usize,
    /// Number of dynamic template tags removed or rewritten
    pub template_tags: usize,
    /// Names of the repair rules that changed the text
    pub repairs:       Vec<&'static str>
}

/// Result of SQL preprocessing.
#[derive(Debug, Clone)]
pub struct PreprocessorResult {
    /// Transformed SQL ready for parsing
    pub sql:      String,
    /// Extracted metadata
    pub metadata: PreprocessorMetadata,
    placeholder:  bool
}

impl PreprocessorResult {
    /// True when validation rejected the text and [`PLACEHOLDER_SQL`] was
    /// substituted.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl Preprocessor {
    /// Create a new preprocessor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize, repair and validate raw SQL text.
    #[must_use]
    pub fn process(&self, raw: &str) -> PreprocessorResult {
        let mut metadata = PreprocessorMetadata::default();
        let normalized = template::normalize(raw, &mut metadata);
        let repaired = repair::repair(&normalized, &mut metadata);

        if is_valid_structure(&repaired) {
            PreprocessorResult {
                sql: repaired,
                metadata,
                placeholder: false
            }
        } else {
            PreprocessorResult {
                sql: PLACEHOLDER_SQL.to_string(),
                metadata,
                placeholder: true
            }
        }
    }
}

/// Check that repaired text has the basic shape of a DML statement.
pub fn is_valid_structure(sql: &str) -> bool {
    let upper = sql.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return false;
    }
    STATEMENT_START_REGEX.is_match(&upper)
        && !DANGLING_CLAUSE_REGEX.is_match(&upper)
        && !upper.contains("WHERE WHERE")
        && !upper.contains("FROM FROM")
}
