pub mod language;
pub mod metadata;
pub mod model;
pub mod strategies;

#[cfg(test)]
mod tests;

pub use model::{ExtractedContent, PageMetadata, TierOutput};
pub use strategies::{ExtractionStrategy, RawPage, default_chain};

use scraper::Html;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::fetcher::{self, FetchError};

/// Extracted text shorter than this is treated as a failed extraction.
pub const MIN_CONTENT_CHARS: usize = 100;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extracted content is too short or empty ({0} characters)")]
    TooShort(usize),
}

/// Fetches a page and runs the extraction tiers over it in order.
pub struct ContentExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(default_chain())
    }
}

impl ContentExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    #[instrument(skip_all, fields(url = %url, stage = "extract"))]
    pub async fn extract_content(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<ExtractedContent, ExtractionError> {
        let page = fetcher::fetch(url, timeout).await.map_err(|e| {
            error!("Failed to fetch URL {}: {}", url, e);
            ExtractionError::from(e)
        })?;

        let content = self.extract_html(&page.body, &page.url_final, url)?;
        info!(
            "Successfully extracted content from: {} ({} chars)",
            url,
            content.text.chars().count()
        );
        Ok(content)
    }

    /// Run the tiers over already-fetched markup. `source_url` is what the
    /// caller asked for and is echoed back unchanged.
    pub fn extract_html(
        &self,
        html: &str,
        page_url: &Url,
        source_url: &str,
    ) -> Result<ExtractedContent, ExtractionError> {
        let document = Html::parse_document(html);
        let page = RawPage {
            html,
            document: &document,
            url: page_url,
        };

        let output = self.strategies.iter().find_map(|strategy| {
            let output = strategy.attempt(&page)?;
            if output.text.trim().is_empty() {
                return None;
            }
            debug!("Extraction tier '{}' produced text", strategy.name());
            Some(output)
        });

        let Some(output) = output else {
            error!("No extraction tier produced text for {}", source_url);
            return Err(ExtractionError::TooShort(0));
        };

        let text = output.text.trim().to_string();
        let length = text.chars().count();
        if length < MIN_CONTENT_CHARS {
            error!(
                "Content extraction failed for {}: only {} characters",
                source_url, length
            );
            return Err(ExtractionError::TooShort(length));
        }

        let metadata = output.metadata.unwrap_or_default();
        Ok(ExtractedContent {
            language: language::detect_language(&text),
            text,
            title: metadata.title.trim().to_string(),
            description: metadata.description.trim().to_string(),
            author: metadata.author.trim().to_string(),
            date: metadata.date.trim().to_string(),
            url: source_url.to_string(),
        })
    }
}

/// Prefix of `text` up to `max_length` characters, pulled back to the last
/// full stop when that still keeps more than 70% of the requested length.
pub fn get_summary(text: &str, max_length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let summary: String = text.chars().take(max_length).collect();
    let cut = summary
        .rfind('.')
        .filter(|&i| summary[..i].chars().count() as f64 > max_length as f64 * 0.7);

    match cut {
        Some(i) => summary[..=i].trim().to_string(),
        None => summary.trim().to_string(),
    }
}
