//! Single-flight refresh on top of [`CredentialStore`].
//!
//! Every caller that finds a credential expired takes that credential's lock,
//! checks again, and only then asks the fetcher for a new value. Callers that
//! queued on the lock see the refreshed value on their re-check, so one expiry
//! costs one remote call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use super::{CredentialKind, CredentialLock, CredentialLockGuard, FreshCredential, TicketType};
use crate::store::CredentialStore;
use crate::{Error, Result};

/// Blocking boundary to the remote API.
pub trait CredentialFetcher: Send + Sync {
    fn fetch(&self, kind: CredentialKind, store: &CredentialStore) -> Result<FreshCredential>;
}

/// Async boundary to the remote API.
#[async_trait]
pub trait AsyncCredentialFetcher: Send + Sync {
    async fn fetch(
        &self,
        kind: CredentialKind,
        store: Arc<CredentialStore>,
    ) -> Result<FreshCredential>;
}

pub struct RefreshCoordinator<F> {
    store: Arc<CredentialStore>,
    fetcher: Arc<F>,
    lock_timeout: Option<Duration>,
}

impl<F> Clone for RefreshCoordinator<F> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetcher: Arc::clone(&self.fetcher),
            lock_timeout: self.lock_timeout,
        }
    }
}

impl<F> RefreshCoordinator<F> {
    pub fn new(store: Arc<CredentialStore>, fetcher: F) -> Self {
        Self {
            store,
            fetcher: Arc::new(fetcher),
            lock_timeout: None,
        }
    }

    /// Give up with [`Error::LockTimeout`] instead of waiting indefinitely
    /// for another caller's refresh.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F: CredentialFetcher> RefreshCoordinator<F> {
    pub fn credential(&self, kind: CredentialKind) -> Result<SecretString> {
        if let Some(value) = valid_value(&self.store, kind) {
            return Ok(value);
        }

        let lock = self.store.lock_for(kind);
        let _guard = acquire(&lock, self.lock_timeout)?;

        if let Some(value) = valid_value(&self.store, kind) {
            return Ok(value);
        }

        let fresh = self.fetcher.fetch(kind, &self.store).inspect_err(|e| {
            tracing::warn!(kind = %kind, error = %e, "Credential refresh failed");
        })?;
        Ok(apply(&self.store, kind, fresh))
    }

    pub fn access_token(&self) -> Result<SecretString> {
        self.credential(CredentialKind::AccessToken)
    }

    pub fn ticket(&self, ticket: TicketType) -> Result<SecretString> {
        self.credential(ticket.into())
    }

    /// Expire and refresh.
    ///
    /// Callers whose `expire` lands before the first refresh completes share
    /// one fetch. A caller that expires the slot after someone else refreshed
    /// it triggers another fetch.
    pub fn force_refresh(&self, kind: CredentialKind) -> Result<SecretString> {
        self.store.expire(kind);
        self.credential(kind)
    }
}

impl<F: AsyncCredentialFetcher + 'static> RefreshCoordinator<F> {
    /// Async flavour of [`credential`](Self::credential).
    ///
    /// The refresh lock is thread-bound, so the slow path runs on a blocking
    /// thread that drives the fetch future to completion while holding it.
    pub async fn credential_async(&self, kind: CredentialKind) -> Result<SecretString> {
        if let Some(value) = valid_value(&self.store, kind) {
            return Ok(value);
        }

        let store = Arc::clone(&self.store);
        let fetcher = Arc::clone(&self.fetcher);
        let timeout = self.lock_timeout;
        let handle = tokio::runtime::Handle::current();

        tokio::task::spawn_blocking(move || -> Result<SecretString> {
            let lock = store.lock_for(kind);
            let _guard = acquire(&lock, timeout)?;

            if let Some(value) = valid_value(&store, kind) {
                return Ok(value);
            }

            let fresh = handle
                .block_on(fetcher.fetch(kind, Arc::clone(&store)))
                .inspect_err(|e| {
                    tracing::warn!(kind = %kind, error = %e, "Credential refresh failed");
                })?;
            Ok(apply(&store, kind, fresh))
        })
        .await
        .map_err(|e| Error::Join(e.to_string()))?
    }

    pub async fn force_refresh_async(&self, kind: CredentialKind) -> Result<SecretString> {
        self.store.expire(kind);
        self.credential_async(kind).await
    }
}

impl CredentialStore {
    /// Expire the access token if `error` says the remote side rejected it.
    /// Returns whether it did.
    pub fn expire_on_error(&self, error: &Error) -> bool {
        if error.is_credential_invalid() {
            tracing::debug!(errcode = ?error.errcode(), "Remote rejected access token");
            self.expire_access_token();
            true
        } else {
            false
        }
    }
}

fn valid_value(store: &CredentialStore, kind: CredentialKind) -> Option<SecretString> {
    let snapshot = store.snapshot(kind);
    if snapshot.is_expired_at(store.now_millis()) {
        None
    } else {
        snapshot.value
    }
}

fn acquire(lock: &CredentialLock, timeout: Option<Duration>) -> Result<CredentialLockGuard<'_>> {
    match timeout {
        Some(waited) => lock.try_lock_for(waited).ok_or(Error::LockTimeout {
            kind: lock.kind(),
            waited,
        }),
        None => Ok(lock.lock()),
    }
}

fn apply(store: &CredentialStore, kind: CredentialKind, fresh: FreshCredential) -> SecretString {
    let value = SecretString::from(fresh.value.clone());
    store.update(kind, fresh.value, fresh.expires_in_secs);
    tracing::debug!(kind = %kind, "Credential refreshed");
    value
}
