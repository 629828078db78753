use crate::fetcher::{decode::decode_body, errors::FetchError};
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "Mozilla/5.0 (compatible; seoblog/0.1; blog generator)";

// Timeouts are applied per request so each stage can bound its own call.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                reqwest::header::HeaderValue::from_static(
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                ),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

/// A successfully fetched HTML page, decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub body: String,
    pub encoding: &'static str,
}

/// GET the page. Any non-2xx status is a hard failure.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &str, timeout: Duration) -> Result<PageResponse, FetchError> {
    let parsed_url = Url::parse(url)?;

    let response = HTTP_CLIENT
        .get(parsed_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let url_final = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Content-Length may be absent or wrong
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    let (body, encoding) = decode_body(&content_type, &body_bytes);
    debug!(
        "Fetched {} bytes from {} ({})",
        body_bytes.len(),
        url_final,
        encoding
    );

    Ok(PageResponse {
        url_final,
        status,
        body,
        encoding,
    })
}

/// Lightweight HEAD request following redirects. Returns the final status
/// whatever it is; callers decide what counts as reachable.
#[instrument(skip_all, fields(url = %url))]
pub async fn probe(url: &str, timeout: Duration) -> Result<StatusCode, FetchError> {
    let parsed_url = Url::parse(url)?;

    let response = HTTP_CLIENT
        .head(parsed_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    Ok(response.status())
}
