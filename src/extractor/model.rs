use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Readable text and metadata pulled from one page. Metadata fields are
/// empty strings, never absent, when the page does not provide them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: String,
    pub url: String,
    /// ISO 639-3 code of the detected language.
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: String,
}

/// What a single extraction tier produced. Tiers that cannot see metadata
/// leave it as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierOutput {
    pub text: String,
    pub metadata: Option<PageMetadata>,
}

impl TierOutput {
    pub fn text_only(text: String) -> Self {
        Self {
            text,
            metadata: None,
        }
    }
}

/// Collapse runs of spaces and tabs, keep paragraph breaks.
pub fn normalize_whitespace(text: &str) -> String {
    let spaced = WHITESPACE_RUN.replace_all(text.trim(), " ");
    let lines = spaced
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES.replace_all(&lines, "\n\n").trim().to_string()
}
