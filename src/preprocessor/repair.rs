//! Repair of SQL fragments broken by template tag removal.
//!
//! Removing a conditional tag leaves behind whatever surrounded it: a `WHERE`
//! with nothing after it, an `AND` at the start of the condition list, a
//! trailing comma in a `SET` list. Each [`RepairRule`] patches one such shape.
//! Rules are applied in order and the whole list is re-run until the text stops
//! changing.

use std::sync::LazyLock;

use regex::Regex;

use super::{PreprocessorMetadata, template::collapse_whitespace};

/// Upper bound on full passes over the rule list.
const MAX_PASSES: usize = 4;

/// A single named rewrite.
pub struct RepairRule {
    pub name:    &'static str,
    regex:       Regex,
    replacement: &'static str
}

impl RepairRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("valid regex"),
            replacement
        }
    }

    fn apply(&self, sql: &str) -> Option<String> {
        if !self.regex.is_match(sql) {
            return None;
        }
        let out = self.regex.replace_all(sql, self.replacement);
        (out != sql).then(|| out.into_owned())
    }
}

static RULES: LazyLock<Vec<RepairRule>> = LazyLock::new(|| {
    vec![
        RepairRule::new("leading-connective", r"(?i)^\s*(?:AND|OR)\s+", ""),
        RepairRule::new(
            "duplicate-connective",
            r"(?i)\b(?:AND|OR)\s+(?:AND|OR)\b",
            "AND"
        ),
        RepairRule::new("duplicate-where", r"(?i)\bWHERE\s+WHERE\b", "WHERE"),
        RepairRule::new("where-connective", r"(?i)\bWHERE\s+(?:AND|OR)\s+", "WHERE "),
        RepairRule::new("trailing-connective", r"(?i)\s+(?:AND|OR)\s*$", ""),
        RepairRule::new(
            "empty-where",
            r"(?i)\bWHERE\s+(ORDER\s+BY|GROUP\s+BY|HAVING|LIMIT)\b",
            "$1"
        ),
        RepairRule::new("trailing-where", r"(?i)\s*\bWHERE\s*$", ""),
        RepairRule::new(
            "dangling-comma",
            r"(?i),\s*(\bFROM\b|\bWHERE\b|\)|$)",
            " $1"
        ),
        RepairRule::new(
            "from-connective",
            r#"(?i)\bFROM\s+([\w`"'.]+)\s+(?:WHERE\s+)?(AND|OR)\b"#,
            "FROM $1 WHERE 1=1 $2"
        ),
        RepairRule::new("bare-from", r"(?i)^\s*(FROM\s+\w)", "SELECT * $1"),
        RepairRule::new("bare-select", r"(?i)^\s*SELECT\s*$", "SELECT 1"),
    ]
});

/// Apply every repair rule until the text is stable.
pub fn repair(sql: &str, metadata: &mut PreprocessorMetadata) -> String {
    let mut current = sql.to_string();
    for _ in 0..MAX_PASSES {
        let mut changed = false;
        for rule in RULES.iter() {
            if let Some(next) = rule.apply(&current) {
                current = collapse_whitespace(&next);
                changed = true;
                if !metadata.repairs.contains(&rule.name) {
                    metadata.repairs.push(rule.name);
                }
            }
        }
        if !changed {
            break;
        }
    }
    current
}
