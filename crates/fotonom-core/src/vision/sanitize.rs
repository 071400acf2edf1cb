//! Filename-safe token sanitization.

/// Maximum token length in characters.
const MAX_LEN: usize = 30;

/// Allowed characters besides the hyphen separator: ASCII alphanumerics and
/// German umlauts/eszett, since classifications are German tokens.
fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, 'ä' | 'ö' | 'ü' | 'Ä' | 'Ö' | 'Ü' | 'ß')
}

/// Make a free-text classification token safe for use inside a file name.
///
/// Trims, collapses whitespace runs to a single hyphen, drops everything
/// outside the allow-list, collapses hyphen runs, and truncates to 30
/// characters. Idempotent: sanitizing sanitized output is a no-op.
pub fn sanitize(s: &str) -> String {
    let mut out = String::new();
    for ch in s.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else if is_allowed(ch) {
            out.push(ch);
        }
    }
    out.chars().take(MAX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_becomes_single_hyphen() {
        assert_eq!(sanitize("Central Park"), "Central-Park");
        assert_eq!(sanitize("Central   Park"), "Central-Park");
        assert_eq!(sanitize("  Strand  "), "Strand");
    }

    #[test]
    fn test_disallowed_characters_dropped() {
        assert_eq!(sanitize("Café!"), "Café");
        assert_eq!(sanitize("Straße (Nord)"), "Straße-Nord");
        assert_eq!(sanitize("a.b/c"), "abc");
    }

    #[test]
    fn test_umlauts_preserved() {
        assert_eq!(sanitize("Büro"), "Büro");
        assert_eq!(sanitize("gemütlich"), "gemütlich");
    }

    #[test]
    fn test_hyphen_runs_collapse() {
        assert_eq!(sanitize("Parken--verboten"), "Parken-verboten");
        assert_eq!(sanitize("a ! b"), "a-b");
    }

    #[test]
    fn test_truncates_to_30_chars() {
        let long = "a".repeat(50);
        assert_eq!(sanitize(&long).chars().count(), 30);
        // Character-indexed, not byte-indexed
        let umlauts = "ö".repeat(50);
        assert_eq!(sanitize(&umlauts).chars().count(), 30);
    }

    #[test]
    fn test_idempotent() {
        for s in [
            "Central Park",
            "  Straße (Nord)  ",
            "Parken--verboten!",
            "ä ö ü ß",
            "",
            "---",
            &"xö".repeat(40),
        ] {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("!!!"), "");
    }
}
