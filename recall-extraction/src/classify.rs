use std::sync::LazyLock;

use regex::Regex;

static IPV4_PORT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<ip>(?:\d{1,3}\.){3}\d{1,3})(?::\d{1,5})?$").ok());
static IDENTIFIER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Za-z]\w*-\w+").ok());
static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d+$").ok());
static CODE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Z0-9_]{3,}$").ok());

fn matches(re: &LazyLock<Option<Regex>>, s: &str) -> bool {
    re.as_ref().is_some_and(|r| r.is_match(s))
}

/// The IPv4 address in `token` if it is `a.b.c.d` or `a.b.c.d:port`.
pub fn split_ip_port(token: &str) -> Option<&str> {
    IPV4_PORT
        .as_ref()?
        .captures(token)
        .and_then(|c| c.name("ip"))
        .map(|m| m.as_str())
}

/// Coarse entity type for a token.
pub fn classify_entity_type(token: &str) -> &'static str {
    let s = token.trim();
    if s.is_empty() {
        return "unknown";
    }
    if matches(&IPV4_PORT, s) {
        return "ip";
    }
    if s.starts_with('/') || s.starts_with("./") {
        return "path";
    }
    if s.starts_with("blk_") {
        return "block_id";
    }
    if matches(&IDENTIFIER, s) {
        return "identifier";
    }
    if matches(&NUMBER, s) {
        return "number";
    }
    if matches(&CODE, s) {
        return "code";
    }
    "token"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_log_tokens() {
        assert_eq!(classify_entity_type("10.250.19.102:54106"), "ip");
        assert_eq!(classify_entity_type("/mnt/hadoop/dfs/data"), "path");
        assert_eq!(classify_entity_type("blk_-1608999687919862906"), "block_id");
        assert_eq!(classify_entity_type("node-42"), "identifier");
        assert_eq!(classify_entity_type("50010"), "number");
        assert_eq!(classify_entity_type("E_CONN_RESET"), "code");
        assert_eq!(classify_entity_type("PacketResponder"), "token");
        assert_eq!(classify_entity_type("  "), "unknown");
    }

    #[test]
    fn splits_ip_from_port() {
        assert_eq!(split_ip_port("10.0.0.1:50010"), Some("10.0.0.1"));
        assert_eq!(split_ip_port("10.0.0.1"), Some("10.0.0.1"));
        assert_eq!(split_ip_port("host:50010"), None);
    }
}
