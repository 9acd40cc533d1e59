//! Convenient re-exports for common usage.
//!
//! ```rust
//! use wx_mp_config::prelude::*;
//! ```

pub use crate::auth::{
    AccessToken, AsyncCredentialFetcher, CredentialFetcher, CredentialKind, CredentialLock,
    FreshCredential, RefreshCoordinator, TicketType,
};
pub use crate::client::{ProxyConfig, RetryPolicy};
pub use crate::clock::{Clock, SystemClock};
pub use crate::config::{AccountConfig, HostConfig};
pub use crate::store::CredentialStore;
pub use crate::{Error, Result};
