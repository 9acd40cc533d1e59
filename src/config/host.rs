//! Host overrides for the API, open-platform and MP domains.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

pub const DEFAULT_API_HOST: &str = "https://api.weixin.qq.com";
pub const DEFAULT_OPEN_HOST: &str = "https://open.weixin.qq.com";
pub const DEFAULT_MP_HOST: &str = "https://mp.weixin.qq.com";

/// Replacement base URLs, e.g. for a reverse proxy in front of the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    pub api_host: Option<String>,
    pub open_host: Option<String>,
    pub mp_host: Option<String>,
}

impl HostConfig {
    pub fn with_api_host(mut self, host: &str) -> Result<Self> {
        self.api_host = Some(normalize_host(host)?);
        Ok(self)
    }

    pub fn with_open_host(mut self, host: &str) -> Result<Self> {
        self.open_host = Some(normalize_host(host)?);
        Ok(self)
    }

    pub fn with_mp_host(mut self, host: &str) -> Result<Self> {
        self.mp_host = Some(normalize_host(host)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.api_host.is_none() && self.open_host.is_none() && self.mp_host.is_none()
    }

    /// Join `prefix` and `path`, swapping a default host prefix for its override.
    pub fn build_url(config: Option<&HostConfig>, prefix: &str, path: &str) -> String {
        let host = config
            .and_then(|c| match prefix {
                DEFAULT_API_HOST => c.api_host.as_deref(),
                DEFAULT_OPEN_HOST => c.open_host.as_deref(),
                DEFAULT_MP_HOST => c.mp_host.as_deref(),
                _ => None,
            })
            .unwrap_or(prefix);
        format!("{host}{path}")
    }
}

fn normalize_host(host: &str) -> Result<String> {
    let parsed = Url::parse(host)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(crate::Error::Config(format!(
            "host override must be http(s): {host}"
        )));
    }
    Ok(host.trim_end_matches('/').to_string())
}
