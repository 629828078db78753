//! URL format and reachability checks run before any page is fetched.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::fetcher::{self, FetchError};

pub const INVALID_FORMAT: &str = "Invalid URL format";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .unwrap()
});

/// Outcome of [`validate`]: whether the URL may be processed and why not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlValidation {
    pub ok: bool,
    pub message: String,
}

impl UrlValidation {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Scheme, host (domain, `localhost` or dotted IPv4), optional port and path.
pub fn is_valid_format(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && URL_PATTERN.is_match(url)
}

/// HEAD the URL once. Reachable means a final status below 400.
pub async fn check_reachable(url: &str, timeout: Duration) -> UrlValidation {
    match fetcher::probe(url, timeout).await {
        Ok(status) if status.as_u16() < 400 => {
            info!("URL is reachable: {} (status: {})", url, status.as_u16());
            UrlValidation::pass("URL is reachable")
        }
        Ok(status) => {
            warn!("URL returned error: {} (status: {})", url, status.as_u16());
            UrlValidation::fail(format!("URL returned status code {}", status.as_u16()))
        }
        Err(FetchError::Timeout) => {
            warn!("URL timeout: {}", url);
            UrlValidation::fail("Request timeout - URL took too long to respond")
        }
        Err(FetchError::Connect(_)) => {
            warn!("Connection error: {}", url);
            UrlValidation::fail("Connection error - Could not reach the URL")
        }
        Err(e) => {
            error!("Request error for {}: {}", url, e);
            UrlValidation::fail(format!("Request error: {}", e))
        }
    }
}

/// Format check, then reachability. A malformed URL is never probed.
pub async fn validate(url: &str, timeout: Duration) -> UrlValidation {
    if !is_valid_format(url) {
        return UrlValidation::fail(INVALID_FORMAT);
    }
    check_reachable(url.trim(), timeout).await
}
