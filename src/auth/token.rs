//! Credential payloads exchanged with the remote API boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Success payload of the access token endpoints.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Advertised lifetime in seconds.
    pub expires_in: i64,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A freshly fetched credential, as returned by a fetcher.
#[derive(Clone)]
pub struct FreshCredential {
    pub value: String,
    pub expires_in_secs: i64,
}

impl FreshCredential {
    pub fn new(value: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            value: value.into(),
            expires_in_secs,
        }
    }
}

impl From<AccessToken> for FreshCredential {
    fn from(token: AccessToken) -> Self {
        Self {
            value: token.access_token,
            expires_in_secs: token.expires_in,
        }
    }
}

impl fmt::Debug for FreshCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshCredential")
            .field("value", &"[redacted]")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}
