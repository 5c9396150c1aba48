//! Word normalization shared by ingestion and search.
//!
//! A word is a maximal run of alphanumeric characters, optionally joined by
//! inner apostrophes (`don't`, `o'clock`). Words are lowercased. Subtitle
//! markup (`<i>`, `{\an8}`) is not a word and is skipped.

use std::collections::HashSet;

/// Split `text` into normalized words, in order of first appearance, each
/// word at most once.
pub fn distinct_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(text)
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Normalize a single search term the same way ingestion normalizes text.
///
/// Returns `None` when the term contains no word characters. If the term
/// contains several words, the first one is used.
pub fn normalize_word(term: &str) -> Option<String> {
    words(term).into_iter().next()
}

fn words(text: &str) -> Vec<String> {
    strip_markup(text)
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|raw| raw.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Replace `<...>` and `{...}` spans with spaces. An opening bracket with
/// no closer after it is kept as text.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(&['<', '{'][..]) {
        let close = if rest[open..].starts_with('<') { '>' } else { '}' };
        let Some(len) = rest[open..].find(close) else {
            out.push_str(&rest[..=open]);
            rest = &rest[open + 1..];
            continue;
        };
        out.push_str(&rest[..open]);
        out.push(' ');
        rest = &rest[open + len + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(
            distinct_words("Lazarus! Where is LAZARUS?"),
            vec!["lazarus", "where", "is"]
        );
    }

    #[test]
    fn test_keeps_inner_apostrophes() {
        assert_eq!(distinct_words("'Don't' go"), vec!["don't", "go"]);
    }

    #[test]
    fn test_skips_markup() {
        assert_eq!(
            distinct_words("{\\an8}<i>Pretty, pretty good</i>"),
            vec!["pretty", "good"]
        );
    }

    #[test]
    fn test_unclosed_markup_is_kept() {
        assert_eq!(distinct_words("I <3 Larry"), vec!["i", "3", "larry"]);
        assert_eq!(strip_markup("a {b"), "a {b");
        assert_eq!(strip_markup("<i>a</i> < b"), " a  < b");
        assert_eq!(strip_markup("<3 {\\an8}x"), "<3  x");
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Lazarus, "), Some("lazarus".to_string()));
        assert_eq!(normalize_word("?!"), None);
        assert_eq!(normalize_word(""), None);
    }

    #[test]
    fn test_dashes_split_words() {
        assert_eq!(distinct_words("well--maybe"), vec!["well", "maybe"]);
    }
}
