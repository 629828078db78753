#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use seoblog::{
    app_state::AppState,
    auth::JwtService,
    extractor::ContentExtractor,
    generator::{BlogGenerator, GenerationBackend, GenerationRequest},
    history::InMemoryHistoryStore,
    keywords::{KeywordExtractor, SharedKeywordModel},
    pipeline::{BlogPipeline, PipelineSettings},
};

pub const TEST_SECRET: &str = "integration-secret";

pub const STUB_POST: &str = "# Building Better Software APIs\n\
Well designed software APIs let teams ship faster.\n\
## Why API Design Matters\n\
Clear contracts keep programming teams aligned.\n\n\n\
## Getting Started\n\
Start small and document every endpoint.";

pub const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Designing Software APIs That Last</title>
  <meta name="description" content="A practical guide to designing durable software APIs.">
  <meta name="keywords" content="software, api, programming">
  <meta name="author" content="Dana Reyes">
</head>
<body>
  <nav><a href="/">Home</a> <a href="/blog">Blog</a></nav>
  <article>
    <h1>Designing Software APIs That Last</h1>
    <p>Software teams depend on stable API contracts. When an API changes without warning,
    every client application that consumes it breaks, and programming effort is wasted on
    emergency fixes instead of new features.</p>
    <p>Good API design starts with resources. Name each software resource clearly, keep
    endpoints predictable, and version the API from the first release so that programming
    teams can evolve the software without breaking existing integrations.</p>
    <p>Documentation is part of the API. Every endpoint needs examples, error codes, and a
    description of rate limits. Developers evaluate software platforms by how quickly they
    can make a first successful API call.</p>
    <p>Finally, measure how the API is used. Usage data shows which software features
    matter, which endpoints are slow, and where programming time should go next.</p>
  </article>
  <footer>Copyright Example Software Inc.</footer>
</body>
</html>"#;

/// Backend that answers every prompt with [`STUB_POST`].
pub struct StubBackend;

#[async_trait]
impl GenerationBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Ok(STUB_POST.to_string())
    }
}

/// Serve `html` at `route` for both the reachability probe and the fetch.
pub async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn test_settings() -> PipelineSettings {
    PipelineSettings {
        max_retries: 0,
        ..PipelineSettings::default()
    }
}

pub fn pipeline_with(backend: Arc<dyn GenerationBackend>) -> BlogPipeline {
    BlogPipeline::new(
        Arc::new(ContentExtractor::default()),
        KeywordExtractor::new(Arc::new(SharedKeywordModel::lexical())),
        BlogGenerator::new(backend),
        test_settings(),
    )
}

pub fn test_state() -> AppState {
    AppState::new(
        pipeline_with(Arc::new(StubBackend)),
        Arc::new(InMemoryHistoryStore::new()),
        JwtService::new(TEST_SECRET),
    )
}

pub fn bearer(user_id: uuid::Uuid) -> String {
    let token = JwtService::new(TEST_SECRET)
        .generate_token(user_id)
        .expect("token");
    format!("Bearer {token}")
}
