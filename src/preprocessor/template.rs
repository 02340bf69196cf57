//! Normalization of templated mapping SQL.
//!
//! Handles the constructs mapping files embed in SQL bodies:
//! - `#{param}` / `${param}` - parameter placeholders
//! - `<where>` / `<set>` - rewritten to the keyword they stand for
//! - `<trim prefix="...">` - rewritten to its prefix
//! - `<foreach>...</foreach>` - collapsed to a single-element list `(1)`
//! - `<selectKey>...</selectKey>` - removed with its body
//! - any other tag (`<if>`, `<choose>`, `<include/>`, ...) - removed, body kept
//! - `<![CDATA[ ... ]]>`, `<!-- ... -->` and XML entities

use std::sync::LazyLock;

use regex::Regex;

use super::PreprocessorMetadata;

/// Literal substituted for every parameter placeholder.
pub const PARAMETER_LITERAL: &str = "1";

static PARAMETER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#$]\{[^}]*\}").expect("valid regex"));

static XML_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static FOREACH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<foreach\b[^>]*>.*?</foreach\s*>").expect("valid regex")
});

static WHERE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<where\s*>").expect("valid regex"));

static SET_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<set\s*>").expect("valid regex"));

static TRIM_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<trim\b[^>]*?\bprefix\s*=\s*"([^"]*)"[^>]*>"#).expect("valid regex")
});

static SELECT_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<selectKey\b[^>]*>.*?</selectKey\s*>").expect("valid regex")
});

/// Any remaining tag, opener, closer or self-closing. Attributes must be
/// `name="value"` pairs so comparisons such as `a<b AND c>d` are left alone.
static DYNAMIC_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"</?[A-Za-z][\w.:-]*(?:\s+[\w.:-]+\s*=\s*(?:"[^"]*"|'[^']*'))*\s*/?>"#
    )
    .expect("valid regex")
});

static CDATA_SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid regex"));

static CDATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!\[CDATA\[|\]\]>").expect("valid regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize templated SQL into plain single-line SQL.
pub fn normalize(sql: &str, metadata: &mut PreprocessorMetadata) -> String {
    // CDATA bodies are escaped so tag stripping cannot touch them; entity
    // decoding restores them at the end.
    let result = CDATA_SECTION_REGEX.replace_all(sql, |caps: &regex::Captures<'_>| {
        caps[1].replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    });
    metadata.placeholders += PARAMETER_REGEX.find_iter(&result).count();
    let result = PARAMETER_REGEX.replace_all(&result, PARAMETER_LITERAL);
    let result = XML_COMMENT_REGEX.replace_all(&result, " ");

    metadata.template_tags += SELECT_KEY_REGEX.find_iter(&result).count();
    let result = SELECT_KEY_REGEX.replace_all(&result, " ");

    metadata.template_tags += FOREACH_REGEX.find_iter(&result).count();
    let result = FOREACH_REGEX.replace_all(&result, " (1) ");

    metadata.template_tags += WHERE_TAG_REGEX.find_iter(&result).count();
    let result = WHERE_TAG_REGEX.replace_all(&result, " WHERE ");
    metadata.template_tags += SET_TAG_REGEX.find_iter(&result).count();
    let result = SET_TAG_REGEX.replace_all(&result, " SET ");
    metadata.template_tags += TRIM_PREFIX_REGEX.find_iter(&result).count();
    let result = TRIM_PREFIX_REGEX.replace_all(&result, " $1 ");

    metadata.template_tags += DYNAMIC_TAG_REGEX.find_iter(&result).count();
    let result = DYNAMIC_TAG_REGEX.replace_all(&result, " ");
    let result = CDATA_REGEX.replace_all(&result, " ");
    let result = decode_entities(&result);

    collapse_whitespace(&result)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(sql: &str) -> String {
    WHITESPACE_REGEX.replace_all(sql, " ").trim().to_string()
}

fn decode_entities(sql: &str) -> String {
    if !sql.contains('&') {
        return sql.to_string();
    }
    sql.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
