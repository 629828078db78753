use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    blog::dtos::{
        BlogResponse, ErrorResponse, GenerateBlogRequest, GenerateBlogResponse,
        HistoryItemResponse, HistoryListResponse, HistoryQuery, PreviewRequest, PreviewResponse,
    },
    pipeline::PipelineError,
};

/// Everything a blog endpoint can fail with.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    NotFound,
    Storage(anyhow::Error),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Pipeline(PipelineError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, category, message) = match self {
            ApiError::Pipeline(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.title(), err.category(), err.to_string())
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "not_found",
                "Blog not found or you do not have access".to_string(),
            ),
            ApiError::Storage(e) => {
                error!("History store error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error",
                    "server_error",
                    "An error occurred while accessing history".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                category: category.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[utoipa::path(
    post,
    path = "/v1/blog/generate",
    tag = "blog",
    request_body = GenerateBlogRequest,
    responses(
        (status = 200, description = "Blog generated", body = GenerateBlogResponse),
        (status = 400, description = "Invalid input, URL or content", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Generation or server failure", body = ErrorResponse)
    )
)]
pub async fn generate_blog(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<GenerateBlogRequest>, JsonRejection>,
) -> Result<Json<GenerateBlogResponse>, ApiError> {
    let Json(payload) = payload?;
    let (url, config) = payload.into_parts(&state.pipeline.settings().length_limits)?;

    let generated = state.pipeline.generate(&url, config).await?;

    let record = state
        .history
        .create(generated.history_record(user.user_id))
        .await
        .map_err(|e| {
            ApiError::Pipeline(PipelineError::Server(format!("history store: {e:#}")))
        })?;
    info!("Blog generation complete! ID: {}", record.id);

    Ok(Json(GenerateBlogResponse {
        message: "Blog generated successfully".to_string(),
        blog: BlogResponse::new(record.id, generated),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/blog/preview",
    tag = "blog",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Extracted content preview", body = PreviewResponse),
        (status = 400, description = "Invalid URL or content", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn preview_content(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Json(payload) = payload?;
    let url = payload.into_url()?;
    let preview = state.pipeline.preview(&url).await?;
    Ok(Json(PreviewResponse { preview }))
}

#[utoipa::path(
    get,
    path = "/v1/blog/history",
    tag = "blog",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Caller's generated blogs, newest first", body = HistoryListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn get_history(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryListResponse>, ApiError> {
    let (limit, skip) = query.resolve();

    let history = state
        .history
        .list_for_user(user.user_id, limit, skip)
        .await
        .map_err(ApiError::Storage)?;
    let total = state
        .history
        .count_for_user(user.user_id)
        .await
        .map_err(ApiError::Storage)?;

    Ok(Json(HistoryListResponse {
        history,
        total,
        limit,
        skip,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/blog/history/{id}",
    tag = "blog",
    params(("id" = String, Path, description = "History record id")),
    responses(
        (status = 200, description = "The record", body = HistoryItemResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Missing or owned by someone else", body = ErrorResponse)
    )
)]
pub async fn get_blog_by_id(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryItemResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;

    let blog = state
        .history
        .find_for_user(id, user.user_id)
        .await
        .map_err(ApiError::Storage)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(HistoryItemResponse { blog }))
}
