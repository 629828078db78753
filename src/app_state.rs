use anyhow::Result;
use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    extractor::ContentExtractor,
    generator::{BlogGenerator, GeminiBackend},
    history::{HistoryStore, InMemoryHistoryStore},
    keywords::{KeywordExtractor, SharedKeywordModel},
    pipeline::{BlogPipeline, PipelineSettings},
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: BlogPipeline,
    pub history: Arc<dyn HistoryStore>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pipeline: BlogPipeline, history: Arc<dyn HistoryStore>, jwt: JwtService) -> Self {
        Self {
            pipeline,
            history,
            jwt: Arc::new(jwt),
        }
    }

    /// Production wiring: Gemini backend, lexical keyword model, in-memory history.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = GeminiBackend::new(
            config.gemini_api_key(),
            config.gemini_model(),
            config.gemini_base_url(),
            config.generation_timeout(),
        )?;
        let pipeline = build_pipeline(
            config,
            BlogGenerator::new(Arc::new(backend)),
            Arc::new(SharedKeywordModel::lexical()),
        );

        Ok(Self::new(
            pipeline,
            Arc::new(InMemoryHistoryStore::new()),
            JwtService::new(config.jwt_secret()),
        ))
    }
}

pub fn build_pipeline(
    config: &Config,
    generator: BlogGenerator,
    model: Arc<SharedKeywordModel>,
) -> BlogPipeline {
    BlogPipeline::new(
        Arc::new(ContentExtractor::default()),
        KeywordExtractor::new(model),
        generator,
        PipelineSettings::from(config),
    )
}
