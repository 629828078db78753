mod helpers;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use helpers::{ARTICLE_HTML, bearer, mount_page, test_state};
use seoblog::router::build_router;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::MockServer;

fn app() -> Router {
    build_router(test_state())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn post_json(uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz_sets_request_id() {
    let response = send(
        &app(),
        Request::builder().uri("/healthz").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["generator"], "stub");
}

#[tokio::test]
async fn test_incoming_request_id_is_propagated() {
    let response = send(
        &app(),
        Request::builder()
            .uri("/healthz")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_openapi_document_lists_blog_routes() {
    let response = send(
        &app(),
        Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    for route in [
        "/healthz",
        "/v1/blog/generate",
        "/v1/blog/preview",
        "/v1/blog/history",
        "/v1/blog/history/{id}",
    ] {
        assert!(doc["paths"].get(route).is_some(), "{route} missing");
    }
}

#[tokio::test]
async fn test_blog_routes_require_token() {
    let app = app();
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/v1/blog/generate")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "url": "https://example.com" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get_with("/v1/blog/history", "Bearer not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["category"], "unauthorized");
}

#[tokio::test]
async fn test_generate_then_read_history() {
    let page = MockServer::start().await;
    mount_page(&page, "/article", ARTICLE_HTML).await;
    let url = format!("{}/article", page.uri());

    let app = app();
    let owner = Uuid::new_v4();
    let auth = bearer(owner);

    let response = send(
        &app,
        post_json(
            "/v1/blog/generate",
            &auth,
            json!({ "url": url, "length": 800, "tone": "technical", "include_cta": false }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Blog generated successfully");
    let blog = &json["blog"];
    assert_eq!(blog["title"], "Building Better Software APIs");
    assert_eq!(blog["website_url"], url);
    assert_eq!(blog["topic_analysis"]["category"], "technology");
    let id = blog["id"].as_str().unwrap().to_string();

    let response = send(&app, get_with("/v1/blog/history", &auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["limit"], 10);
    assert_eq!(list["skip"], 0);
    assert_eq!(list["history"][0]["id"], id);
    assert_eq!(list["history"][0]["blog_config"]["tone"], "technical");
    assert_eq!(list["history"][0]["blog_config"]["length"], 800);
    assert_eq!(list["history"][0]["blog_config"]["include_cta"], false);

    let response = send(&app, get_with(&format!("/v1/blog/history/{id}"), &auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["blog"]["website_url"], url);

    // someone else cannot see it
    let stranger = bearer(Uuid::new_v4());
    let response = send(&app, get_with(&format!("/v1/blog/history/{id}"), &stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&app, get_with("/v1/blog/history", &stranger)).await;
    assert_eq!(body_json(response).await["total"], 0);
}

#[tokio::test]
async fn test_preview_route() {
    let page = MockServer::start().await;
    mount_page(&page, "/article", ARTICLE_HTML).await;
    let url = format!("{}/article", page.uri());

    let response = send(
        &app(),
        post_json("/v1/blog/preview", &bearer(Uuid::new_v4()), json!({ "url": url })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["preview"]["title"], "Designing Software APIs That Last");
    assert_eq!(json["preview"]["url"], url);
}

#[tokio::test]
async fn test_bad_input_is_categorized() {
    let app = app();
    let auth = bearer(Uuid::new_v4());

    let response = send(&app, post_json("/v1/blog/generate", &auth, json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["category"], "invalid_input");
    assert_eq!(json["message"], "URL is required");

    let response = send(
        &app,
        post_json(
            "/v1/blog/generate",
            &auth,
            json!({ "url": "not a url", "length": 1000 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["category"], "invalid_url");
    assert_eq!(json["message"], "Invalid URL format");
}
