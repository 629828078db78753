//! Rule-based intent and category classification.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::info;
use utoipa::ToSchema;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

const MAX_MAIN_TOPICS: usize = 5;

const COMMERCIAL_TERMS: &[&str] = &["buy", "purchase", "price", "cost", "deal", "discount", "sale"];
const EDUCATIONAL_TERMS: &[&str] = &["learn", "tutorial", "guide", "how to", "course", "training"];
const REVIEW_TERMS: &[&str] = &["review", "comparison", "vs", "versus", "best", "top"];

const CATEGORY_TERMS: &[(Category, &[&str])] = &[
    (
        Category::Technology,
        &["software", "technology", "programming", "code", "app", "digital", "web", "api"],
    ),
    (
        Category::Business,
        &["business", "marketing", "sales", "strategy", "management", "enterprise"],
    ),
    (
        Category::Health,
        &["health", "medical", "wellness", "fitness", "nutrition", "healthcare"],
    ),
    (
        Category::Education,
        &["education", "learning", "course", "training", "teaching", "student"],
    ),
    (
        Category::Finance,
        &["finance", "money", "investment", "banking", "insurance", "credit"],
    ),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Informational,
    Commercial,
    Educational,
    Review,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Business,
    Health,
    Education,
    Finance,
    #[default]
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Informational => "informational",
            Intent::Commercial => "commercial",
            Intent::Educational => "educational",
            Intent::Review => "review",
        }
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Health => "health",
            Category::Education => "education",
            Category::Finance => "finance",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopicAnalysis {
    pub intent: Intent,
    pub topic_summary: String,
    pub category: Category,
    pub word_count: usize,
    pub sentence_count: usize,
    pub main_topics: Vec<String>,
}

impl Default for TopicAnalysis {
    fn default() -> Self {
        Self {
            intent: Intent::Informational,
            topic_summary: "General content".to_string(),
            category: Category::General,
            word_count: 0,
            sentence_count: 0,
            main_topics: Vec::new(),
        }
    }
}

/// Classify `text` and its `keywords`. Terms match as substrings, and the
/// first lexicon that matches decides.
pub fn analyze_topics(text: &str, keywords: &[String]) -> TopicAnalysis {
    let analysis = TopicAnalysis {
        intent: determine_intent(text),
        topic_summary: topic_summary(keywords),
        category: categorize(keywords),
        word_count: text.split_whitespace().count(),
        sentence_count: SENTENCE_END.split(text).count(),
        main_topics: keywords.iter().take(MAX_MAIN_TOPICS).cloned().collect(),
    };

    info!(
        "Topic analysis complete: {} - {}",
        analysis.category, analysis.intent
    );
    analysis
}

fn determine_intent(text: &str) -> Intent {
    let text = text.to_lowercase();
    let matches = |terms: &[&str]| terms.iter().any(|term| text.contains(term));

    if matches(COMMERCIAL_TERMS) {
        Intent::Commercial
    } else if matches(EDUCATIONAL_TERMS) {
        Intent::Educational
    } else if matches(REVIEW_TERMS) {
        Intent::Review
    } else {
        Intent::Informational
    }
}

fn categorize(keywords: &[String]) -> Category {
    let joined = keywords.join(" ").to_lowercase();
    CATEGORY_TERMS
        .iter()
        .find(|(_, terms)| terms.iter().any(|term| joined.contains(term)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

fn topic_summary(keywords: &[String]) -> String {
    match keywords {
        [] => "General content".to_string(),
        [only] => format!("Content about {only}"),
        [first, second] => format!("Content about {first} and {second}"),
        [first, second, third, ..] => format!("Content covering {first}, {second}, and {third}"),
    }
}
