use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Gemini API authentication failed. Please check API key configuration.")]
    Authentication,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Content generation blocked by safety filters. Try a different topic or URL.")]
    SafetyBlocked,

    #[error("Blog generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    /// Classify a backend failure by the markers in its message.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if message.contains("API_KEY_INVALID") || lower.contains("invalid api key") {
            Self::Authentication
        } else if message.contains("RATE_LIMIT_EXCEEDED") || lower.contains("quota") {
            Self::RateLimited
        } else if message.contains("SAFETY") || lower.contains("blocked") {
            Self::SafetyBlocked
        } else {
            Self::Failed(message.to_string())
        }
    }
}
