//! Interpolation tokens that must survive translation untouched.
//!
//! i18next uses `{{name}}` for interpolation and `$t(key)` for nesting. The
//! provider is told to keep them, but models occasionally translate or drop
//! them, so translations are checked against their source text.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}|\$t\([^()]*\)").expect("valid regex"));

/// All interpolation and nesting tokens in `text`, sorted.
pub fn tokens(text: &str) -> Vec<&str> {
    let mut found: Vec<&str> = TOKEN.find_iter(text).map(|m| m.as_str()).collect();
    found.sort_unstable();
    found
}

/// Tokens whose count differs between `source` and `translated`.
///
/// Empty when the translation kept every token exactly.
pub fn mismatched<'a>(source: &'a str, translated: &'a str) -> Vec<&'a str> {
    let expected = tokens(source);
    let actual = tokens(translated);
    if expected == actual {
        return Vec::new();
    }

    let mut diff: Vec<&str> = expected
        .iter()
        .chain(actual.iter())
        .copied()
        .filter(|token| {
            expected.iter().filter(|t| *t == token).count()
                != actual.iter().filter(|t| *t == token).count()
        })
        .collect();
    diff.sort_unstable();
    diff.dedup();
    diff
}
