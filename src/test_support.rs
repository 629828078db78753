//! Shared fixtures for in-crate handler tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::JwtService,
    extractor::ContentExtractor,
    generator::{BlogGenerator, GenerationBackend, GenerationRequest},
    history::{HistoryStore, InMemoryHistoryStore},
    keywords::{KeywordExtractor, SharedKeywordModel},
    pipeline::{BlogPipeline, PipelineSettings},
};

pub const TEST_SECRET: &str = "test-secret";

/// Backend that always answers with the same post.
pub struct StubBackend;

#[async_trait]
impl GenerationBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Ok("# Stub Post\nGenerated body text.".to_string())
    }
}

pub fn test_state() -> AppState {
    test_state_with_history(Arc::new(InMemoryHistoryStore::new()))
}

pub fn test_state_with_history(history: Arc<dyn HistoryStore>) -> AppState {
    let pipeline = BlogPipeline::new(
        Arc::new(ContentExtractor::default()),
        KeywordExtractor::new(Arc::new(SharedKeywordModel::lexical())),
        BlogGenerator::new(Arc::new(StubBackend)),
        PipelineSettings::default(),
    );
    AppState::new(pipeline, history, JwtService::new(TEST_SECRET))
}

pub fn bearer(user_id: Uuid) -> String {
    let token = JwtService::new(TEST_SECRET)
        .generate_token(user_id)
        .expect("token");
    format!("Bearer {token}")
}
