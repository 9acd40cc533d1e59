//! Environment variable loading for [`AccountConfig`].

use std::env;
use std::str::FromStr;

use secrecy::SecretString;

use super::{AccountConfig, HostConfig};
use crate::client::ProxyConfig;

pub const DEFAULT_ENV_PREFIX: &str = "WX_MP_";

impl AccountConfig {
    /// Load from `WX_MP_*` variables. Returns `None` when no app id is set.
    pub fn from_env() -> Option<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn from_env_with_prefix(prefix: &str) -> Option<Self> {
        let var = |name: &str| env::var(format!("{prefix}{name}")).ok();

        let mut config = Self::new(var("APP_ID")?);
        config.secret = var("SECRET").map(SecretString::from);
        config.token = var("TOKEN").map(SecretString::from);
        config.aes_key = var("AES_KEY").map(SecretString::from);
        config.template_id = var("TEMPLATE_ID");
        config.oauth2_redirect_url = var("OAUTH2_REDIRECT_URL");
        config.qr_connect_redirect_url = var("QR_CONNECT_REDIRECT_URL");
        config.proxy = ProxyConfig::from_env_with_prefix(prefix);
        config.tmp_dir = var("TMP_DIR").map(Into::into);

        if let Some(millis) = parse_or_warn(prefix, "RETRY_SLEEP_MILLIS") {
            config.retry.retry_sleep_millis = millis;
        }
        if let Some(times) = parse_or_warn(prefix, "MAX_RETRY_TIMES") {
            config.retry.max_retry_times = times;
        }

        if let Some(api_host) = var("API_HOST") {
            match HostConfig::default().with_api_host(&api_host) {
                Ok(hosts) => config.host_config = Some(hosts),
                Err(e) => tracing::warn!(value = %api_host, error = %e, "Ignoring invalid API host"),
            }
        }

        Some(config)
    }
}

fn parse_or_warn<T: FromStr>(prefix: &str, name: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let key = format!("{prefix}{name}");
    let raw = env::var(&key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, value = %raw, error = %e, "Invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_missing_app_id() {
        assert!(AccountConfig::from_env_with_prefix("NO_SUCH_ACCOUNT_").is_none());
    }

    #[test]
    fn test_from_env() {
        // SAFETY: Test-only environment setup
        unsafe {
            std::env::set_var("ENV_CFG_TEST_APP_ID", "wx-env");
            std::env::set_var("ENV_CFG_TEST_SECRET", "env-secret");
            std::env::set_var("ENV_CFG_TEST_RETRY_SLEEP_MILLIS", "300");
            std::env::set_var("ENV_CFG_TEST_MAX_RETRY_TIMES", "not-a-number");
            std::env::set_var("ENV_CFG_TEST_API_HOST", "https://api.gateway.local");
        }

        let config = AccountConfig::from_env_with_prefix("ENV_CFG_TEST_").unwrap();
        assert_eq!(config.app_id, "wx-env");
        assert_eq!(config.secret.as_ref().unwrap().expose_secret(), "env-secret");
        assert_eq!(config.retry.retry_sleep_millis, 300);
        assert_eq!(config.retry.max_retry_times, 5);
        assert_eq!(
            config.host_config.unwrap().api_host.as_deref(),
            Some("https://api.gateway.local")
        );
        assert!(config.proxy.is_none());

        unsafe {
            for name in [
                "APP_ID",
                "SECRET",
                "RETRY_SLEEP_MILLIS",
                "MAX_RETRY_TIMES",
                "API_HOST",
            ] {
                std::env::remove_var(format!("ENV_CFG_TEST_{name}"));
            }
        }
    }
}
