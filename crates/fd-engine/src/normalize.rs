//! Text normalization: URL folding and separator stripping.

use std::sync::LazyLock;

use regex::Regex;

use crate::hash::sha1_hex;

// ASCII word boundary: a scheme glued to CJK text still starts a URL,
// one glued to a Latin letter does not.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(?:https?|ftp)://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|]").unwrap()
});

/// CJK punctuation removed alongside ASCII punctuation:
/// “ ” ， 。 ！ （ ） ～ ： ； 「 」 『 』
const CJK_PUNCT: &[char] = &[
    '\u{201C}', '\u{201D}', '\u{FF0C}', '\u{3002}', '\u{FF01}', '\u{FF08}', '\u{FF09}',
    '\u{FF5E}', '\u{FF1A}', '\u{FF1B}', '\u{300C}', '\u{300D}', '\u{300E}', '\u{300F}',
];

/// Deterministic stand-in for a URL. The brackets are stripped again with
/// the rest of the punctuation.
pub fn url_token(url: &str) -> String {
    format!("URL[{}]", sha1_hex(url))
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || CJK_PUNCT.contains(&c)
}

/// Replace URLs with hash tokens, then drop whitespace and punctuation.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let folded = RE_URL.replace_all(text, |caps: &regex::Captures| url_token(&caps[0]));
    folded.chars().filter(|&c| !is_separator(c)).collect()
}

/// Length used for bucket selection, in characters.
pub fn normalized_len(normalized: &str) -> usize {
    normalized.chars().count()
}
