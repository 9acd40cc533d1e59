//! HTTP-side plumbing consumed by credential fetchers: proxy, retry policy,
//! client construction and endpoint URLs.

pub mod endpoint;
mod http;
mod network;
mod retry;

pub use http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DefaultHttpClientBuilder, HttpClientBuilder};
pub use network::ProxyConfig;
pub use retry::{DEFAULT_MAX_RETRY_TIMES, DEFAULT_RETRY_SLEEP_MILLIS, RetryPolicy};
