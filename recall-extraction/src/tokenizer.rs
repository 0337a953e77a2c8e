/// Characters kept at token edges: they carry meaning in paths, ids, and
/// `host:port` pairs.
fn is_edge_keeper(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ':')
}

/// Split on whitespace and trim punctuation from both ends of each token.
pub fn tokenize_candidates(message: &str) -> Vec<&str> {
    message
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !is_edge_keeper(c)))
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Letter,
    Other,
}

fn class_of(c: char) -> CharClass {
    if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::Other
    }
}

/// Number of character-class changes (digit / letter / other) along the
/// token. Tokens shorter than two characters score 0.
pub fn token_complexity(token: &str) -> usize {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    let mut last = class_of(first);
    let mut transitions = 0;
    let mut len = 1;
    for c in chars {
        len += 1;
        let cur = class_of(c);
        if cur != last {
            transitions += 1;
        }
        last = cur;
    }
    if len < 2 {
        0
    } else {
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_edge_punctuation() {
        assert_eq!(
            tokenize_candidates("Served (blk_123), to [/10.0.0.1:50010];"),
            vec!["Served", "blk_123", "to", "/10.0.0.1:50010"]
        );
    }

    #[test]
    fn drops_pure_punctuation() {
        assert!(tokenize_candidates("  *** ()  ").is_empty());
    }

    #[test]
    fn complexity_counts_class_changes() {
        assert_eq!(token_complexity("blk_123"), 2);
        assert_eq!(token_complexity("10.0.0.1"), 6);
        assert_eq!(token_complexity("hello"), 0);
        assert_eq!(token_complexity("x"), 0);
        assert_eq!(token_complexity(""), 0);
    }
}
