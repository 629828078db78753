//! URL in, SEO-ready blog out. Each stage runs to completion before the next.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cleaner,
    config::{Config, LengthLimits},
    extractor::{self, ContentExtractor, ExtractionError, MIN_CONTENT_CHARS},
    generator::{BlogGenerator, DEFAULT_MAX_RETRIES, GenerationError},
    history::NewHistoryRecord,
    keywords::KeywordExtractor,
    prompt::{self, BlogConfig, BlogConfigError},
    seo::{self, ProcessedBlog},
    topics::{self, TopicAnalysis},
    validator,
};

const GENERATION_KEYWORDS: usize = 15;
const PREVIEW_KEYWORDS: usize = 10;
const PREVIEW_SUMMARY_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("The webpage does not contain enough meaningful content")]
    InsufficientContent,

    #[error("Could not extract meaningful keywords from content")]
    NoKeywords,

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("An unexpected error occurred during blog generation")]
    Server(String),
}

impl From<BlogConfigError> for PipelineError {
    fn from(err: BlogConfigError) -> Self {
        PipelineError::InvalidInput(err.to_string())
    }
}

impl PipelineError {
    /// Stable machine-readable code.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::InvalidUrl(_) => "invalid_url",
            PipelineError::Extraction(ExtractionError::TooShort(_)) => "insufficient_content",
            PipelineError::Extraction(_) => "extraction_failed",
            PipelineError::InsufficientContent => "insufficient_content",
            PipelineError::NoKeywords => "keyword_extraction_failed",
            PipelineError::Generation(_) => "generation_failed",
            PipelineError::Server(_) => "server_error",
        }
    }

    /// Short human heading for the error.
    pub fn title(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "Invalid input",
            PipelineError::InvalidUrl(_) => "Invalid URL",
            PipelineError::Extraction(ExtractionError::TooShort(_)) => "Insufficient content",
            PipelineError::Extraction(_) => "Content extraction failed",
            PipelineError::InsufficientContent => "Insufficient content",
            PipelineError::NoKeywords => "Keyword extraction failed",
            PipelineError::Generation(_) => "Blog generation failed",
            PipelineError::Server(_) => "Server error",
        }
    }

    /// Failures caused by the request or the page rather than by us.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            PipelineError::Generation(_) | PipelineError::Server(_)
        )
    }
}

/// Timeouts and limits the pipeline runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub fetch_timeout: Duration,
    pub probe_timeout: Duration,
    pub max_content_length: usize,
    pub length_limits: LengthLimits,
    pub max_retries: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: extractor::DEFAULT_FETCH_TIMEOUT,
            probe_timeout: validator::DEFAULT_PROBE_TIMEOUT,
            max_content_length: 50_000,
            length_limits: LengthLimits::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            fetch_timeout: config.request_timeout(),
            probe_timeout: config.probe_timeout(),
            max_content_length: config.max_content_length(),
            length_limits: config.length_limits(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeneratedBlog {
    pub blog: ProcessedBlog,
    pub keywords: Vec<String>,
    pub topic_analysis: TopicAnalysis,
    pub website_url: String,
    pub blog_config: BlogConfig,
}

impl GeneratedBlog {
    pub fn history_record(&self, user_id: Uuid) -> NewHistoryRecord {
        NewHistoryRecord {
            user_id,
            website_url: self.website_url.clone(),
            keywords: self.keywords.clone(),
            generated_blog: self.blog.content.clone(),
            blog_config: self.blog_config.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContentPreview {
    pub title: String,
    pub description: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub word_count: usize,
    pub url: String,
}

#[derive(Clone)]
pub struct BlogPipeline {
    extractor: Arc<ContentExtractor>,
    keywords: KeywordExtractor,
    generator: BlogGenerator,
    settings: PipelineSettings,
}

impl BlogPipeline {
    pub fn new(
        extractor: Arc<ContentExtractor>,
        keywords: KeywordExtractor,
        generator: BlogGenerator,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            extractor,
            keywords,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn generator(&self) -> &BlogGenerator {
        &self.generator
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn generate(&self, url: &str, config: BlogConfig) -> Result<GeneratedBlog, PipelineError> {
        let url = url.trim();
        config.validate(&self.settings.length_limits)?;
        info!("Starting blog generation for URL: {}", url);

        let cleaned = self.fetch_and_clean(url).await?;
        let content = cleaned.content;
        let text = cleaned.text;

        if text.chars().count() < MIN_CONTENT_CHARS {
            error!("Insufficient content after cleaning for {}", url);
            return Err(PipelineError::InsufficientContent);
        }

        info!("Step 4: Extracting keywords...");
        let keywords = self
            .keywords
            .extract_keywords_list(&text, GENERATION_KEYWORDS, true);
        if keywords.is_empty() {
            error!("No keywords extracted for {}", url);
            return Err(PipelineError::NoKeywords);
        }

        info!("Step 5: Analyzing topics and intent...");
        let topic_analysis = topics::analyze_topics(&text, &keywords);

        info!("Step 6: Building prompt...");
        let prompt = prompt::build_blog_prompt(&content, &keywords, &topic_analysis, &config);

        info!("Step 7: Generating blog...");
        let raw = self
            .generator
            .generate_with_retry(&prompt, self.settings.max_retries)
            .await
            .inspect_err(|e| error!("Generation failed for {}: {}", url, e))?;

        info!("Step 8: Applying SEO post-processing...");
        let blog = seo::process_blog(&raw, &keywords);

        info!("Blog generation complete for {}", url);
        Ok(GeneratedBlog {
            blog,
            keywords,
            topic_analysis,
            website_url: url.to_string(),
            blog_config: config,
        })
    }

    /// Validation, extraction, cleaning and keywords only.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn preview(&self, url: &str) -> Result<ContentPreview, PipelineError> {
        let url = url.trim();
        let cleaned = self.fetch_and_clean(url).await?;

        let keywords = self
            .keywords
            .extract_keywords_list(&cleaned.text, PREVIEW_KEYWORDS, true);

        Ok(ContentPreview {
            title: cleaned.content.title,
            description: cleaned.content.description,
            summary: extractor::get_summary(&cleaned.text, PREVIEW_SUMMARY_CHARS),
            keywords,
            word_count: cleaned.text.split_whitespace().count(),
            url: url.to_string(),
        })
    }

    async fn fetch_and_clean(&self, url: &str) -> Result<CleanedPage, PipelineError> {
        info!("Step 1: Validating URL...");
        let validation = validator::validate(url, self.settings.probe_timeout).await;
        if !validation.ok {
            error!("URL validation failed for {}: {}", url, validation.message);
            return Err(PipelineError::InvalidUrl(validation.message));
        }

        info!("Step 2: Extracting content...");
        let content = self
            .extractor
            .extract_content(url, self.settings.fetch_timeout)
            .await?;

        info!("Step 3: Cleaning extracted text...");
        let text = cleaner::clean_text(&content.text, Some(self.settings.max_content_length));
        Ok(CleanedPage { content, text })
    }
}

struct CleanedPage {
    content: extractor::ExtractedContent,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;

    #[test]
    fn categories_follow_error_kind() {
        let cases: Vec<(PipelineError, &str, bool)> = vec![
            (PipelineError::InvalidInput("x".into()), "invalid_input", true),
            (PipelineError::InvalidUrl("x".into()), "invalid_url", true),
            (
                PipelineError::Extraction(ExtractionError::Fetch(FetchError::Timeout)),
                "extraction_failed",
                true,
            ),
            (
                PipelineError::Extraction(ExtractionError::TooShort(12)),
                "insufficient_content",
                true,
            ),
            (PipelineError::InsufficientContent, "insufficient_content", true),
            (PipelineError::NoKeywords, "keyword_extraction_failed", true),
            (
                PipelineError::Generation(GenerationError::RateLimited),
                "generation_failed",
                false,
            ),
            (PipelineError::Server("db".into()), "server_error", false),
        ];

        for (err, category, client) in cases {
            assert_eq!(err.category(), category);
            assert_eq!(err.is_client_error(), client, "{category}");
        }
    }

    #[test]
    fn config_errors_are_invalid_input() {
        let err: PipelineError = BlogConfigError::LengthOutOfRange { min: 500, max: 3000 }.into();
        assert_eq!(err.category(), "invalid_input");
        assert_eq!(err.to_string(), "Blog length must be between 500 and 3000 words");
    }

    #[test]
    fn history_record_carries_processed_content() {
        let generated = GeneratedBlog {
            blog: ProcessedBlog::minimal("# Body", &[]),
            keywords: vec!["rust".into()],
            topic_analysis: TopicAnalysis::default(),
            website_url: "https://example.com".into(),
            blog_config: BlogConfig::default(),
        };
        let user = Uuid::new_v4();
        let record = generated.history_record(user);
        assert_eq!(record.user_id, user);
        assert_eq!(record.generated_blog, "# Body");
        assert_eq!(record.keywords, vec!["rust".to_string()]);
    }
}
