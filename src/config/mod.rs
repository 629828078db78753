//! Configuration handling for the application.
//!
//! Every value the pipeline consumes (model identifier, API credential,
//! timeouts, content and blog length limits) is read here once and handed to
//! the stages explicitly. `Config::from_env` falls back to development
//! defaults for anything that is not set.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names. Public so tests and binaries can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "PROBE_TIMEOUT_SECS";
pub const ENV_GENERATION_TIMEOUT_SECS: &str = "GENERATION_TIMEOUT_SECS";
pub const ENV_MAX_CONTENT_LENGTH: &str = "MAX_CONTENT_LENGTH";
pub const ENV_MIN_BLOG_LENGTH: &str = "MIN_BLOG_LENGTH";
pub const ENV_MAX_BLOG_LENGTH: &str = "MAX_BLOG_LENGTH";
pub const ENV_DEFAULT_BLOG_LENGTH: &str = "DEFAULT_BLOG_LENGTH";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 50_000;

/// Bounds on the requested blog length, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl Default for LengthLimits {
    fn default() -> Self {
        Self {
            min: 500,
            max: 3000,
            default: 1000,
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    jwt_secret: String,
    gemini_api_key: String,
    gemini_model: String,
    gemini_base_url: String,
    request_timeout: Duration,
    probe_timeout: Duration,
    generation_timeout: Duration,
    max_content_length: usize,
    length_limits: LengthLimits,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = LengthLimits::default();
        let length_limits = LengthLimits {
            min: parse_var(ENV_MIN_BLOG_LENGTH, defaults.min)?,
            max: parse_var(ENV_MAX_BLOG_LENGTH, defaults.max)?,
            default: parse_var(ENV_DEFAULT_BLOG_LENGTH, defaults.default)?,
        };
        if length_limits.min > length_limits.default || length_limits.default > length_limits.max {
            return Err(ConfigError::InvalidValue {
                field: ENV_DEFAULT_BLOG_LENGTH,
                reason: format!(
                    "expected {} <= {} <= {}",
                    length_limits.min, length_limits.default, length_limits.max
                ),
            });
        }

        Ok(Self {
            bind_addr: string_var(ENV_BIND_ADDR, DEFAULT_BIND_ADDR),
            jwt_secret: string_var(ENV_JWT_SECRET, DEFAULT_JWT_SECRET),
            gemini_api_key: string_var(ENV_GEMINI_API_KEY, ""),
            gemini_model: string_var(ENV_GEMINI_MODEL, DEFAULT_GEMINI_MODEL),
            gemini_base_url: string_var(ENV_GEMINI_BASE_URL, DEFAULT_GEMINI_BASE_URL),
            request_timeout: Duration::from_secs(parse_var(
                ENV_REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            probe_timeout: Duration::from_secs(parse_var(
                ENV_PROBE_TIMEOUT_SECS,
                DEFAULT_PROBE_TIMEOUT_SECS,
            )?),
            generation_timeout: Duration::from_secs(parse_var(
                ENV_GENERATION_TIMEOUT_SECS,
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )?),
            max_content_length: parse_var(ENV_MAX_CONTENT_LENGTH, DEFAULT_MAX_CONTENT_LENGTH)?,
            length_limits,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Secret used for verifying bearer tokens.
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }
    pub fn gemini_model(&self) -> &str {
        &self.gemini_model
    }
    pub fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }
    /// Timeout for the page fetch.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    /// Timeout for the reachability probe.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
    /// Timeout for a single generation call.
    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }
    /// Upper bound, in characters, on cleaned text fed to keyword extraction.
    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }
    pub fn length_limits(&self) -> LengthLimits {
        self.length_limits
    }
}

fn string_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
