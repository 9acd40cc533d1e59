//! # wx-mp-config
//!
//! Thread-safe, in-memory credential cache for the WeChat Official Account
//! API: the access token, the JSAPI / card / SDK tickets, and the settings
//! needed to reach the API (host overrides, proxy, retry policy).
//!
//! Many threads can share one [`CredentialStore`]. When a credential
//! expires, exactly one of them refreshes it while the rest wait on that
//! credential's lock; [`RefreshCoordinator`] packages the protocol.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wx_mp_config::prelude::*;
//!
//! struct StaticFetcher;
//!
//! impl CredentialFetcher for StaticFetcher {
//!     fn fetch(&self, _kind: CredentialKind, _store: &CredentialStore) -> Result<FreshCredential> {
//!         // Call the remote API here.
//!         Ok(FreshCredential::new("ACCESS_TOKEN", 7200))
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let store = Arc::new(CredentialStore::new(AccountConfig::new("wx1234").secret("secret")));
//! let coordinator = RefreshCoordinator::new(store.clone(), StaticFetcher);
//!
//! let token = coordinator.access_token()?;
//! assert!(!store.is_access_token_expired());
//! # drop(token);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod prelude;
pub mod store;

pub use auth::{
    AccessToken, AsyncCredentialFetcher, CredentialFetcher, CredentialKind, CredentialLock,
    FreshCredential, RefreshCoordinator, SAFETY_MARGIN_SECS, SlotSnapshot, TicketType,
};
pub use client::{DefaultHttpClientBuilder, HttpClientBuilder, ProxyConfig, RetryPolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccountConfig, HostConfig};
pub use store::CredentialStore;

/// Remote error codes meaning the access token was rejected.
pub const INVALID_ACCESS_TOKEN_ERRCODES: [i64; 3] = [40001, 40014, 42001];
/// Remote error code for a transient "system busy" response.
pub const SYSTEM_BUSY_ERRCODE: i64 = -1;

/// Error type for wx-mp-config operations.
///
/// Store reads, updates and expiry checks never fail; errors come from
/// refresh coordination, configuration and HTTP client setup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Remote API answered with a non-zero `errcode`.
    #[error("API error {errcode}: {errmsg}")]
    Api { errcode: i64, errmsg: String },

    /// A fetcher could not obtain a fresh credential.
    #[error("Failed to refresh {kind}: {message}")]
    Refresh {
        kind: CredentialKind,
        message: String,
    },

    /// Another caller held the refresh lock past the configured timeout.
    #[error("Timed out after {:.1}s waiting for the {kind} refresh lock", waited.as_secs_f64())]
    LockTimeout {
        kind: CredentialKind,
        waited: std::time::Duration,
    },

    #[error("Unknown credential kind: {0}")]
    UnknownCredentialKind(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client setup or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Background refresh task panicked or was cancelled.
    #[error("Refresh task failed: {0}")]
    Join(String),
}

impl Error {
    pub fn refresh(kind: CredentialKind, message: impl Into<String>) -> Self {
        Error::Refresh {
            kind,
            message: message.into(),
        }
    }

    pub fn errcode(&self) -> Option<i64> {
        match self {
            Error::Api { errcode, .. } => Some(*errcode),
            _ => None,
        }
    }

    /// The remote side rejected the access token; expire it and refresh.
    pub fn is_credential_invalid(&self) -> bool {
        matches!(self, Error::Api { errcode, .. } if INVALID_ACCESS_TOKEN_ERRCODES.contains(errcode))
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { errcode, .. } => *errcode == SYSTEM_BUSY_ERRCODE,
            Error::Network(_) | Error::LockTimeout { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
