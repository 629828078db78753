pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::app_state::AppState;

/// Every `/v1/blog` route. All of them require a bearer token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/blog/generate", post(handlers::generate_blog))
        .route("/v1/blog/preview", post(handlers::preview_content))
        .route("/v1/blog/history", get(handlers::get_history))
        .route("/v1/blog/history/{id}", get(handlers::get_blog_by_id))
}
