//! Structure, metrics and meta description for generated markdown.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{error, info};
use utoipa::ToSchema;

pub const DEFAULT_TITLE: &str = "Blog Post";
pub const WORDS_PER_MINUTE: usize = 200;
pub const META_DESCRIPTION_MAX: usize = 155;
const META_TRUNCATE_AT: usize = 152;
const KEYWORD_PREFIX_ROOM: usize = 140;
const MAX_KEYWORDS: usize = 10;
const FALLBACK_READING_TIME: usize = 5;

struct SeoRules {
    title: Regex,
    heading: Regex,
    markup: Regex,
    blank_runs: Regex,
}

static RULES: LazyLock<Result<SeoRules, regex::Error>> = LazyLock::new(|| {
    Ok(SeoRules {
        title: Regex::new(r"(?m)^#[ \t]+(\S.*?)[ \t\r]*$")?,
        heading: Regex::new(r"(?m)^(#{1,6})[ \t]+(\S.*?)[ \t\r]*$")?,
        markup: Regex::new(r"[#*_`\[\]]")?,
        blank_runs: Regex::new(r"\n{3,}")?,
    })
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProcessedBlog {
    pub content: String,
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub word_count: usize,
    pub reading_time: usize,
    pub keywords: Vec<String>,
}

impl ProcessedBlog {
    /// Original content with placeholder metadata.
    pub fn minimal(content: &str, keywords: &[String]) -> Self {
        Self {
            content: content.to_string(),
            title: DEFAULT_TITLE.to_string(),
            meta_description: String::new(),
            headings: Vec::new(),
            word_count: word_count(content),
            reading_time: FALLBACK_READING_TIME,
            keywords: keywords.iter().take(MAX_KEYWORDS).cloned().collect(),
        }
    }
}

/// Never fails: if the rules cannot be applied the content comes back as
/// [`ProcessedBlog::minimal`].
pub fn process_blog(content: &str, keywords: &[String]) -> ProcessedBlog {
    let rules = match RULES.as_ref() {
        Ok(rules) => rules,
        Err(e) => {
            error!("SEO post-processing failed: {}", e);
            return ProcessedBlog::minimal(content, keywords);
        }
    };

    let word_count = word_count(content);
    let processed = ProcessedBlog {
        content: enhance_formatting_with(rules, content),
        title: extract_title_with(rules, content),
        meta_description: meta_description_with(rules, content, keywords),
        headings: extract_headings_with(rules, content),
        word_count,
        reading_time: reading_time(word_count),
        keywords: keywords.iter().take(MAX_KEYWORDS).cloned().collect(),
    };

    info!(
        "SEO post-processing complete. Word count: {}, Reading time: {} min",
        processed.word_count, processed.reading_time
    );
    processed
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Whole minutes at [`WORDS_PER_MINUTE`], never below one.
pub fn reading_time(word_count: usize) -> usize {
    (word_count / WORDS_PER_MINUTE).max(1)
}

pub fn extract_title(content: &str) -> String {
    match RULES.as_ref() {
        Ok(rules) => extract_title_with(rules, content),
        Err(_) => DEFAULT_TITLE.to_string(),
    }
}

pub fn extract_headings(content: &str) -> Vec<Heading> {
    match RULES.as_ref() {
        Ok(rules) => extract_headings_with(rules, content),
        Err(_) => Vec::new(),
    }
}

pub fn meta_description(content: &str, keywords: &[String]) -> String {
    match RULES.as_ref() {
        Ok(rules) => meta_description_with(rules, content, keywords),
        Err(_) => String::new(),
    }
}

pub fn enhance_formatting(content: &str) -> String {
    match RULES.as_ref() {
        Ok(rules) => enhance_formatting_with(rules, content),
        Err(_) => content.trim().to_string(),
    }
}

fn extract_title_with(rules: &SeoRules, content: &str) -> String {
    rules
        .title
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn extract_headings_with(rules: &SeoRules, content: &str) -> Vec<Heading> {
    rules
        .heading
        .captures_iter(content)
        .map(|c| Heading {
            level: c[1].len() as u8,
            text: c[2].trim().to_string(),
        })
        .collect()
}

fn meta_description_with(rules: &SeoRules, content: &str, keywords: &[String]) -> String {
    let paragraph = content
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))
        .unwrap_or_default();

    let mut description = rules.markup.replace_all(paragraph, "").into_owned();
    if description.chars().count() > META_DESCRIPTION_MAX {
        description = description.chars().take(META_TRUNCATE_AT).collect();
        description.push_str("...");
    }

    // may exceed the length target; kept as is
    if let Some(primary) = keywords.first()
        && !description.to_lowercase().contains(&primary.to_lowercase())
        && description.chars().count() < KEYWORD_PREFIX_ROOM
    {
        description = format!("{primary} - {description}");
    }
    description
}

fn enhance_formatting_with(rules: &SeoRules, content: &str) -> String {
    let content = content.trim();
    let lines: Vec<&str> = content.split('\n').collect();

    let mut spaced: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        spaced.push(line);
        let next_has_content = lines.get(i + 1).is_some_and(|next| !next.is_empty());
        if rules.heading.is_match(line) && next_has_content {
            spaced.push("");
        }
    }

    rules
        .blank_runs
        .replace_all(&spaced.join("\n"), "\n\n")
        .trim()
        .to_string()
}
