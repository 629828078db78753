use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    config::LengthLimits,
    history::HistoryRecord,
    pipeline::{ContentPreview, GeneratedBlog, PipelineError},
    prompt::{BlogConfig, Tone},
    topics::TopicAnalysis,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 50;

/// Body of `POST /v1/blog/generate`. Everything but `url` is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateBlogRequest {
    pub url: Option<String>,
    pub length: Option<i64>,
    pub tone: Option<String>,
    pub include_cta: Option<bool>,
}

impl GenerateBlogRequest {
    /// Apply defaults and check the values before any network work.
    pub fn into_parts(self, limits: &LengthLimits) -> Result<(String, BlogConfig), PipelineError> {
        let url = required_url(self.url)?;
        let tone = match self.tone {
            Some(tone) => tone.parse::<Tone>()?,
            None => Tone::default(),
        };
        // anything outside u32 is out of range anyway
        let length = match self.length {
            Some(length) => u32::try_from(length).unwrap_or(0),
            None => limits.default,
        };

        let config = BlogConfig {
            length,
            tone,
            include_cta: self.include_cta.unwrap_or(true),
        };
        config.validate(limits)?;
        Ok((url, config))
    }
}

/// Body of `POST /v1/blog/preview`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub url: Option<String>,
}

impl PreviewRequest {
    pub fn into_url(self) -> Result<String, PipelineError> {
        required_url(self.url)
    }
}

fn required_url(url: Option<String>) -> Result<String, PipelineError> {
    url.map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| PipelineError::InvalidInput("URL is required".to_string()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogResponse {
    pub id: Uuid,
    pub content: String,
    pub title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub word_count: usize,
    pub reading_time: usize,
    pub website_url: String,
    pub topic_analysis: TopicAnalysis,
}

impl BlogResponse {
    pub fn new(id: Uuid, generated: GeneratedBlog) -> Self {
        Self {
            id,
            content: generated.blog.content,
            title: generated.blog.title,
            meta_description: generated.blog.meta_description,
            keywords: generated.keywords,
            word_count: generated.blog.word_count,
            reading_time: generated.blog.reading_time,
            website_url: generated.website_url,
            topic_analysis: generated.topic_analysis,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateBlogResponse {
    pub message: String,
    pub blog: BlogResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub preview: ContentPreview,
}

/// Raw paging parameters. Unparseable values fall back to the defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl HistoryQuery {
    /// `(limit, skip)`: limit outside 1..=50 becomes 10, negative skip 0.
    pub fn resolve(&self) -> (usize, usize) {
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| (1..=MAX_HISTORY_LIMIT as i64).contains(l))
            .map_or(DEFAULT_HISTORY_LIMIT, |l| l as usize);
        let skip = self
            .skip
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map_or(0, |s| s.max(0) as usize);
        (limit, skip)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryListResponse {
    pub history: Vec<HistoryRecord>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryItemResponse {
    pub blog: HistoryRecord,
}

/// Every error body: a heading, a stable category and a message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub category: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, skip: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            limit: limit.map(str::to_string),
            skip: skip.map(str::to_string),
        }
    }

    #[test]
    fn history_paging_is_clamped() {
        assert_eq!(query(None, None).resolve(), (10, 0));
        assert_eq!(query(Some("25"), Some("5")).resolve(), (25, 5));
        assert_eq!(query(Some("0"), Some("-3")).resolve(), (10, 0));
        assert_eq!(query(Some("51"), None).resolve(), (10, 0));
        assert_eq!(query(Some("50"), None).resolve(), (50, 0));
        assert_eq!(query(Some("many"), Some("x")).resolve(), (10, 0));
    }

    #[test]
    fn generate_request_defaults() {
        let request = GenerateBlogRequest {
            url: Some("  https://example.com ".into()),
            ..Default::default()
        };
        let (url, config) = request.into_parts(&LengthLimits::default()).unwrap();
        assert_eq!(url, "https://example.com");
        assert_eq!(config, BlogConfig::default());
    }

    #[test]
    fn generate_request_rejections() {
        let limits = LengthLimits::default();
        let missing = GenerateBlogRequest::default().into_parts(&limits).unwrap_err();
        assert_eq!(missing.category(), "invalid_input");
        assert_eq!(missing.to_string(), "URL is required");

        for length in [499, -1, i64::MAX] {
            let err = GenerateBlogRequest {
                url: Some("https://example.com".into()),
                length: Some(length),
                ..Default::default()
            }
            .into_parts(&limits)
            .unwrap_err();
            assert_eq!(err.category(), "invalid_input", "{length}");
        }

        let tone = GenerateBlogRequest {
            url: Some("https://example.com".into()),
            tone: Some("angry".into()),
            ..Default::default()
        }
        .into_parts(&limits)
        .unwrap_err();
        assert!(tone.to_string().starts_with("Tone must be one of"));
    }

    #[test]
    fn blank_preview_url_is_invalid_input() {
        let err = PreviewRequest { url: Some("   ".into()) }.into_url().unwrap_err();
        assert_eq!(err.category(), "invalid_input");
    }
}
