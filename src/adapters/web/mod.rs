//! Web adapters. Implement ContentFetcherPort.

pub mod http_fetcher;

pub use http_fetcher::{HttpContentFetcher, DEFAULT_USER_AGENT};
