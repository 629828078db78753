//! Normalization of extracted page text before keyword analysis.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DOT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://\S*").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+").unwrap());
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,!?;:\-'"()&]"#).unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

const ELLIPSIS: &str = "...";

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "this", "but",
        "they", "have", "had", "what", "when", "where", "who", "which", "why", "how",
    ]
    .into_iter()
    .collect()
});

/// Collapse whitespace, drop URLs, e-mail addresses and anything outside
/// word characters and basic punctuation, then cap at `max_length`
/// characters (plus a trailing ellipsis). Never fails.
pub fn clean_text(text: &str, max_length: Option<usize>) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = DOT_RUN.replace_all(&text, ELLIPSIS);
    let text = URL.replace_all(&text, "");
    let text = EMAIL.replace_all(&text, "");
    // curly quotes are outside the whitelist, straighten them before it applies
    let text = text.replace(['\u{201C}', '\u{201D}'], "\"");
    let text = text.replace(['\u{2018}', '\u{2019}'], "'");
    let text = DISALLOWED.replace_all(&text, "");
    let mut text = WHITESPACE_RUN.replace_all(&text, " ").trim().to_string();

    if let Some(max_length) = max_length.filter(|&max| max > 0) {
        if text.chars().count() > max_length {
            text = truncate_at_word(&text, max_length);
        }
    }

    debug!("Cleaned text: {} characters", text.chars().count());
    text
}

fn truncate_at_word(text: &str, max_length: usize) -> String {
    let mut truncated: String = text.chars().take(max_length).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        let kept = truncated[..last_space].chars().count();
        if kept as f64 > max_length as f64 * 0.9 {
            truncated.truncate(last_space);
        }
    }
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Drop a short list of common English function words.
pub fn remove_stop_words(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sentences split on `.`, `!` or `?`, trimmed, at least `min_length` chars.
pub fn extract_sentences(text: &str, min_length: usize) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() >= min_length)
        .map(str::to_string)
        .collect()
}

/// Single spaces, and any run of newlines becomes one paragraph break.
pub fn normalize_whitespace(text: &str) -> String {
    let text = SPACE_RUN.replace_all(text, " ");
    NEWLINE_RUN.replace_all(&text, "\n\n").trim().to_string()
}
