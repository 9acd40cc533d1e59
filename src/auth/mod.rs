//! Credential cache primitives.
//!
//! - **Kinds**: access token plus JSAPI, card and SDK tickets
//! - **Slots**: value, expiry and a reentrant refresh lock per kind
//! - **Refresh**: single-flight coordination around a remote fetcher

mod kind;
mod refresh;
mod slot;
mod token;

pub use kind::{CredentialKind, TicketType};
pub use refresh::{AsyncCredentialFetcher, CredentialFetcher, RefreshCoordinator};
pub(crate) use slot::CredentialSlot;
pub use slot::{
    CredentialLock, CredentialLockGuard, SAFETY_MARGIN_SECS, SlotSnapshot, expiry_millis,
};
pub use token::{AccessToken, FreshCredential};
