//! Text normalization shared by extraction, trigger, and packing.

use std::sync::LazyLock;

use regex::Regex;

static HEX_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b0x[0-9a-f]+\b").ok());
static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b\d+\b").ok());

/// Collapse every run of whitespace into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a message for duplicate detection.
pub fn normalize_for_dedup(msg: &str, case_insensitive: bool) -> String {
    let collapsed = collapse_whitespace(msg.trim());
    if case_insensitive {
        collapsed.to_lowercase()
    } else {
        collapsed
    }
}

/// Mask variable parts of a message so that lines produced by the same
/// template share a key: hex literals become `<HEX>`, numbers `<NUM>`.
pub fn mask_for_template_key(msg: &str) -> String {
    let mut masked = msg.trim().to_lowercase();
    if let Some(re) = HEX_LITERAL.as_ref() {
        masked = re.replace_all(&masked, "<HEX>").into_owned();
    }
    if let Some(re) = NUMBER.as_ref() {
        masked = re.replace_all(&masked, "<NUM>").into_owned();
    }
    collapse_whitespace(&masked)
}
