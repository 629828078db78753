use axum::{Router, routing::get};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    blog::{self, dtos, handlers},
    health, history, keywords, pipeline, prompt, seo, topics,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        handlers::generate_blog,
        handlers::preview_content,
        handlers::get_history,
        handlers::get_blog_by_id,
    ),
    components(schemas(
        health::HealthResponse,
        dtos::GenerateBlogRequest,
        dtos::GenerateBlogResponse,
        dtos::BlogResponse,
        dtos::PreviewRequest,
        dtos::PreviewResponse,
        dtos::HistoryListResponse,
        dtos::HistoryItemResponse,
        dtos::ErrorResponse,
        history::HistoryRecord,
        pipeline::ContentPreview,
        prompt::BlogConfig,
        prompt::Tone,
        topics::TopicAnalysis,
        topics::Intent,
        topics::Category,
        seo::Heading,
        keywords::KeywordCategories,
    )),
    tags(
        (name = "blog", description = "Blog generation from web pages"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// The full HTTP surface with tracing and `x-request-id` handling.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .merge(blog::routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
