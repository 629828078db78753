pub mod client;
pub mod decode;
pub mod errors;

pub use client::{PageResponse, fetch, probe};
pub use errors::FetchError;
