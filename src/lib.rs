pub mod app_state;
pub mod auth;
pub mod blog;
pub mod cleaner;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod health;
pub mod history;
pub mod keywords;
pub mod pipeline;
pub mod prompt;
pub mod router;
pub mod seo;
pub mod topics;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;
