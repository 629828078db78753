//! Extraction tiers, tried in order until one yields text.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::extractor::{
    metadata::extract_metadata,
    model::{TierOutput, normalize_whitespace},
};

static TABLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b.*?</table\s*>").unwrap());
static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Elements whose text is never visible.
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".content",
    ".post",
    ".article",
    "#content",
    "#main",
    ".entry-content",
];
const COMMENT_SELECTORS: &[&str] = &["#comments", ".comments", ".comment-list"];
const BLOCK_TAGS: &[&str] = &[
    "p",
    "li",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "dd",
    "td",
    "th",
    "figcaption",
];
const MIN_CONTAINER_TEXT: usize = 100;

/// A fetched page as seen by the extraction tiers.
pub struct RawPage<'a> {
    pub html: &'a str,
    pub document: &'a Html,
    pub url: &'a Url,
}

/// One way of pulling readable text out of a page.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when this tier found nothing usable.
    fn attempt(&self, page: &RawPage<'_>) -> Option<TierOutput>;
}

/// The production chain: precision, permissive, plain text, raw markup.
pub fn default_chain() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(PrecisionStrategy),
        Box::new(PermissiveStrategy),
        Box::new(PlainTextStrategy),
        Box::new(RawMarkupStrategy),
    ]
}

/// Readability scoring over the page with tables and comments removed.
pub struct PrecisionStrategy;

impl ExtractionStrategy for PrecisionStrategy {
    fn name(&self) -> &'static str {
        "precision"
    }

    fn attempt(&self, page: &RawPage<'_>) -> Option<TierOutput> {
        let without_tables = TABLE_BLOCK.replace_all(page.html, "");
        let stripped = HTML_COMMENT.replace_all(&without_tables, "");

        let article = readability::extractor::extract(&mut stripped.as_bytes(), page.url).ok()?;
        let text = normalize_whitespace(&article.text);
        if text.is_empty() {
            return None;
        }

        let mut metadata = extract_metadata(page.document);
        if metadata.title.is_empty() {
            metadata.title = article.title.trim().to_string();
        }

        Some(TierOutput {
            text,
            metadata: Some(metadata),
        })
    }
}

/// Content-container heuristics, keeping tables and reader comments.
pub struct PermissiveStrategy;

impl ExtractionStrategy for PermissiveStrategy {
    fn name(&self) -> &'static str {
        "permissive"
    }

    fn attempt(&self, page: &RawPage<'_>) -> Option<TierOutput> {
        let container = CONTENT_SELECTORS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .flat_map(|selector| page.document.select(&selector).collect::<Vec<_>>())
            .find(|element| visible_text(*element).trim().len() > MIN_CONTAINER_TEXT)?;

        let mut text = visible_text(container);
        for selector in COMMENT_SELECTORS.iter().filter_map(|s| Selector::parse(s).ok()) {
            for comments in page.document.select(&selector) {
                // already covered when the comments live inside the container
                if comments.ancestors().any(|a| a.id() == container.id()) {
                    continue;
                }
                text.push_str("\n\n");
                text.push_str(&visible_text(comments));
            }
        }

        let text = normalize_whitespace(&text);
        if text.is_empty() {
            return None;
        }

        Some(TierOutput {
            text,
            metadata: Some(extract_metadata(page.document)),
        })
    }
}

/// Text of block-level elements only, no metadata.
pub struct PlainTextStrategy;

impl ExtractionStrategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    fn attempt(&self, page: &RawPage<'_>) -> Option<TierOutput> {
        let selector = Selector::parse(&BLOCK_TAGS.join(", ")).ok()?;
        let blocks = page
            .document
            .select(&selector)
            // outermost blocks only, so nested lists are not counted twice
            .filter(|element| {
                !element.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| BLOCK_TAGS.contains(&e.name()))
                })
            })
            .map(|element| normalize_whitespace(&visible_text(element)))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>();

        if blocks.is_empty() {
            return None;
        }
        Some(TierOutput::text_only(blocks.join("\n\n")))
    }
}

/// Every visible text node in the document. Last resort.
pub struct RawMarkupStrategy;

impl ExtractionStrategy for RawMarkupStrategy {
    fn name(&self) -> &'static str {
        "raw_markup"
    }

    fn attempt(&self, page: &RawPage<'_>) -> Option<TierOutput> {
        let root = page.document.root_element();
        let text = normalize_whitespace(&visible_text(root));
        if text.is_empty() {
            return None;
        }
        Some(TierOutput::text_only(text))
    }
}

/// Concatenated text below `element`, skipping invisible elements.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for descendant in element.descendants() {
        let Node::Text(text) = descendant.value() else {
            continue;
        };
        let hidden = descendant.ancestors().any(|a| {
            ElementRef::wrap(a).is_some_and(|e| INVISIBLE.contains(&e.value().name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}
