//! Category name normalization.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is neither a word character nor whitespace.  `\w` is
/// Unicode-aware, so accented letters and non-Latin scripts survive while
/// emoji and punctuation are dropped.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("NON_WORD pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN pattern is valid"));

/// Strip emoji and punctuation from a category name and normalize its
/// whitespace.
///
/// Case is preserved; use [`comparison_key`] when matching names.
pub fn sanitize_name(name: &str) -> String {
    let stripped = NON_WORD.replace_all(name, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// The key two category names are compared by: sanitized and lower-cased.
pub fn comparison_key(name: &str) -> String {
    sanitize_name(name).to_lowercase()
}

/// Whether two category names refer to the same category.
pub fn same_category(a: &str, b: &str) -> bool {
    comparison_key(a) == comparison_key(b)
}
