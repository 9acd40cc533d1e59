//! HTTP proxy configuration.

use std::env;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::Result;

/// Forward proxy used for all API traffic of an account.
#[derive(Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Read `{prefix}HTTP_PROXY_HOST`, `_PORT`, `_USERNAME` and `_PASSWORD`.
    pub fn from_env_with_prefix(prefix: &str) -> Option<Self> {
        let host = env::var(format!("{prefix}HTTP_PROXY_HOST")).ok()?;
        let port = match env::var(format!("{prefix}HTTP_PROXY_PORT")) {
            Ok(raw) => match raw.trim().parse() {
                Ok(port) => port,
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Invalid proxy port, ignoring proxy");
                    return None;
                }
            },
            Err(_) => 80,
        };

        let mut proxy = Self::new(host, port);
        proxy.username = env::var(format!("{prefix}HTTP_PROXY_USERNAME")).ok();
        proxy.password = env::var(format!("{prefix}HTTP_PROXY_PASSWORD"))
            .ok()
            .map(SecretString::from);
        Some(proxy)
    }

    /// Set basic-auth credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Apply to reqwest ClientBuilder.
    pub fn apply_to_builder(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder> {
        let mut proxy = reqwest::Proxy::all(self.url())?;
        if let Some(ref username) = self.username {
            let password = self
                .password
                .as_ref()
                .map(|p| p.expose_secret())
                .unwrap_or_default();
            proxy = proxy.basic_auth(username, password);
        }
        Ok(builder.proxy(proxy))
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_url() {
        let proxy = ProxyConfig::new("proxy.example.com", 3128);
        assert_eq!(proxy.url(), "http://proxy.example.com:3128");
    }

    #[test]
    fn test_proxy_credentials_redacted() {
        let proxy = ProxyConfig::new("proxy.example.com", 8080).credentials("bob", "hunter2");
        assert_eq!(proxy.username.as_deref(), Some("bob"));
        assert_eq!(proxy.password.as_ref().unwrap().expose_secret(), "hunter2");
        assert!(!format!("{:?}", proxy).contains("hunter2"));
    }

    #[test]
    fn test_apply_to_builder() {
        let proxy = ProxyConfig::new("127.0.0.1", 8888).credentials("user", "pass");
        let builder = proxy.apply_to_builder(reqwest::Client::builder()).unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_from_env() {
        // SAFETY: Test-only environment setup
        unsafe {
            std::env::set_var("PROXY_TEST_HTTP_PROXY_HOST", "10.0.0.1");
            std::env::set_var("PROXY_TEST_HTTP_PROXY_PORT", "8080");
            std::env::set_var("PROXY_TEST_HTTP_PROXY_USERNAME", "alice");
        }
        let proxy = ProxyConfig::from_env_with_prefix("PROXY_TEST_").unwrap();
        assert_eq!(proxy.host, "10.0.0.1");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.username.as_deref(), Some("alice"));
        assert!(proxy.password.is_none());
        unsafe {
            std::env::remove_var("PROXY_TEST_HTTP_PROXY_HOST");
            std::env::remove_var("PROXY_TEST_HTTP_PROXY_PORT");
            std::env::remove_var("PROXY_TEST_HTTP_PROXY_USERNAME");
        }

        assert!(ProxyConfig::from_env_with_prefix("PROXY_TEST_").is_none());
    }
}
