//! Construction of the HTTP client used by credential fetchers.

use std::fmt;
use std::time::Duration;

use crate::Result;
use crate::config::AccountConfig;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("wx-mp-config/", env!("CARGO_PKG_VERSION"));

/// Builds the `reqwest::Client` an account's API calls go through.
///
/// Stored on [`AccountConfig`] as an opaque handle so applications can swap
/// in their own TLS, pool or middleware setup.
pub trait HttpClientBuilder: Send + Sync + fmt::Debug {
    fn build(&self, config: &AccountConfig) -> Result<reqwest::Client>;
}

#[derive(Debug, Clone)]
pub struct DefaultHttpClientBuilder {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DefaultHttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DefaultHttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl HttpClientBuilder for DefaultHttpClientBuilder {
    fn build(&self, config: &AccountConfig) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone());

        if let Some(ref proxy) = config.proxy {
            builder = proxy.apply_to_builder(builder)?;
        }

        Ok(builder.build()?)
    }
}
