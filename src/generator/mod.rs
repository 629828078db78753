pub mod backend;
pub mod errors;

pub use backend::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, GeminiBackend, GenerationBackend,
    GenerationRequest,
};
pub use errors::GenerationError;

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Fixed wait between generation attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const PERSONA: &str = "You are an expert SEO content writer who creates engaging, original, and well-structured blog posts.";

#[derive(Clone)]
pub struct BlogGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl BlogGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// One generation attempt. The returned text is trimmed.
    #[instrument(skip_all, fields(backend = self.backend.name(), stage = "generate"))]
    pub async fn generate_blog(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        info!("Generating blog content with {}...", self.backend.name());
        let request = GenerationRequest::new(format!("{PERSONA}\n\n{prompt}"), max_tokens, temperature);

        match self.backend.generate(&request).await {
            Ok(text) => {
                info!("Blog generated successfully");
                Ok(text.trim().to_string())
            }
            Err(e) => {
                let err = GenerationError::classify(&format!("{e:#}"));
                match &err {
                    GenerationError::Authentication => {
                        error!("Generation API authentication failed. Check API key.")
                    }
                    GenerationError::RateLimited => error!("Generation API rate limit exceeded."),
                    GenerationError::SafetyBlocked => {
                        error!("Content was blocked by safety filters.")
                    }
                    GenerationError::Failed(message) => {
                        error!("Blog generation failed: {}", message)
                    }
                }
                Err(err)
            }
        }
    }

    /// Up to `max_retries + 1` attempts with [`RETRY_DELAY`] between them.
    /// Every error kind is retried; the last one is returned unchanged.
    pub async fn generate_with_retry(
        &self,
        prompt: &str,
        max_retries: u32,
    ) -> Result<String, GenerationError> {
        let mut attempt = 0;
        loop {
            match self
                .generate_blog(prompt, None, DEFAULT_TEMPERATURE)
                .await
            {
                Ok(text) => return Ok(text),
                Err(_) if attempt < max_retries => {
                    attempt += 1;
                    warn!("Generation attempt {} failed, retrying...", attempt);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => {
                    error!("All generation attempts failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
