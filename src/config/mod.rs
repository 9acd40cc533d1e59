//! Static per-account configuration.
//!
//! ```rust
//! use wx_mp_config::config::AccountConfig;
//! use wx_mp_config::client::ProxyConfig;
//!
//! let config = AccountConfig::new("wx1234567890")
//!     .secret("app-secret")
//!     .token("message-token")
//!     .proxy(ProxyConfig::new("10.0.0.1", 3128));
//! assert_eq!(config.app_id, "wx1234567890");
//! ```

mod env;
mod host;

pub use env::DEFAULT_ENV_PREFIX;
pub use host::{DEFAULT_API_HOST, DEFAULT_MP_HOST, DEFAULT_OPEN_HOST, HostConfig};

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use serde::{Serialize, Serializer};

use crate::client::{HttpClientBuilder, ProxyConfig, RetryPolicy};

/// Connection and identity settings for one Official Account.
///
/// Secrets are held as [`SecretString`] and are skipped when serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountConfig {
    pub app_id: String,
    #[serde(skip)]
    pub secret: Option<SecretString>,
    /// Message-signature token.
    #[serde(skip)]
    pub token: Option<SecretString>,
    /// Message encryption key.
    #[serde(skip)]
    pub aes_key: Option<SecretString>,
    pub template_id: Option<String>,
    pub oauth2_redirect_url: Option<String>,
    pub qr_connect_redirect_url: Option<String>,
    #[serde(skip)]
    pub proxy: Option<ProxyConfig>,
    pub retry: RetryPolicy,
    #[serde(serialize_with = "serialize_lossy_path")]
    pub tmp_dir: Option<PathBuf>,
    #[serde(skip)]
    pub http_client_builder: Option<Arc<dyn HttpClientBuilder>>,
    pub host_config: Option<HostConfig>,
}

/// Non-UTF-8 paths are legal temp dirs; render them lossily.
fn serialize_lossy_path<S: Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.serialize_some(&path.to_string_lossy()),
        None => serializer.serialize_none(),
    }
}

impl AccountConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn aes_key(mut self, aes_key: impl Into<String>) -> Self {
        self.aes_key = Some(SecretString::from(aes_key.into()));
        self
    }

    pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn oauth2_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.oauth2_redirect_url = Some(url.into());
        self
    }

    pub fn qr_connect_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.qr_connect_redirect_url = Some(url.into());
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_sleep_millis(mut self, millis: u64) -> Self {
        self.retry.retry_sleep_millis = millis;
        self
    }

    pub fn max_retry_times(mut self, times: u32) -> Self {
        self.retry.max_retry_times = times;
        self
    }

    pub fn tmp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = Some(dir.into());
        self
    }

    pub fn http_client_builder(mut self, builder: Arc<dyn HttpClientBuilder>) -> Self {
        self.http_client_builder = Some(builder);
        self
    }

    pub fn host_config(mut self, host_config: HostConfig) -> Self {
        self.host_config = Some(host_config);
        self
    }

    /// Configured temp directory, falling back to the system one.
    pub fn tmp_dir_or_default(&self) -> PathBuf {
        self.tmp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = AccountConfig::new("wx-app");
        assert_eq!(config.retry.retry_sleep_millis, 1000);
        assert_eq!(config.retry.max_retry_times, 5);
        assert!(config.secret.is_none());
        assert!(config.proxy.is_none());
        assert!(config.host_config.is_none());
    }

    #[test]
    fn test_builder_sets_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccountConfig::new("wx-app")
            .secret("s")
            .token("t")
            .aes_key("k")
            .template_id("tpl")
            .oauth2_redirect_url("https://example.com/oauth")
            .qr_connect_redirect_url("https://example.com/qr")
            .proxy(ProxyConfig::new("proxy", 8080))
            .retry_sleep_millis(250)
            .max_retry_times(2)
            .tmp_dir(dir.path())
            .http_client_builder(Arc::new(crate::client::DefaultHttpClientBuilder::default()))
            .host_config(HostConfig::default());

        assert_eq!(config.secret.as_ref().unwrap().expose_secret(), "s");
        assert_eq!(config.token.as_ref().unwrap().expose_secret(), "t");
        assert_eq!(config.aes_key.as_ref().unwrap().expose_secret(), "k");
        assert_eq!(config.template_id.as_deref(), Some("tpl"));
        assert_eq!(config.retry, RetryPolicy::new(250, 2));
        assert_eq!(config.tmp_dir_or_default(), dir.path());
        assert!(config.http_client_builder.is_some());
        assert_eq!(config.proxy.as_ref().unwrap().port, 8080);
    }

    #[test]
    fn test_tmp_dir_fallback() {
        let config = AccountConfig::new("wx-app");
        assert_eq!(config.tmp_dir_or_default(), std::env::temp_dir());
    }

    #[test]
    fn test_serialize_skips_secrets() {
        let config = AccountConfig::new("wx-app").secret("top-secret").token("tok");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("wx-app"));
        assert!(!json.contains("top-secret"));
        assert!(!json.contains("tok\""));
    }
}
