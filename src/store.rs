//! In-memory credential store for one Official Account.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use secrecy::SecretString;

use crate::auth::{
    AccessToken, CredentialKind, CredentialLock, CredentialSlot, SlotSnapshot, TicketType,
};
use crate::client::{RetryPolicy, endpoint};
use crate::clock::{Clock, SystemClock};
use crate::config::{AccountConfig, HostConfig};

/// Cached access token and tickets plus the account's static configuration.
///
/// One store per account, shared via `Arc`. Reads, expiry checks and
/// updates never block on the refresh locks handed out by
/// [`lock_for`](Self::lock_for); those exist so callers can make sure only
/// one of them refreshes a given credential at a time:
///
/// ```rust
/// use wx_mp_config::{CredentialKind, CredentialStore};
/// use wx_mp_config::config::AccountConfig;
///
/// let store = CredentialStore::new(AccountConfig::new("wx-app"));
/// let kind = CredentialKind::AccessToken;
/// if store.is_expired(kind) {
///     let lock = store.lock_for(kind);
///     let _guard = lock.lock();
///     if store.is_expired(kind) {
///         // fetch from the remote API, then:
///         store.update(kind, "fresh-token", 7200);
///     }
/// }
/// assert!(!store.is_expired(kind));
/// ```
pub struct CredentialStore {
    slots: [CredentialSlot; 4],
    stable_access_token: AtomicBool,
    config: RwLock<Arc<AccountConfig>>,
    config_writer: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    pub fn new(config: AccountConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AccountConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: CredentialKind::ALL.map(CredentialSlot::new),
            stable_access_token: AtomicBool::new(false),
            config: RwLock::new(Arc::new(config)),
            config_writer: Mutex::new(()),
            clock,
        }
    }

    fn slot(&self, kind: CredentialKind) -> &CredentialSlot {
        &self.slots[kind.index()]
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    // Per-kind primitives

    /// True once the clock reaches the stored expiry, including the exact millisecond.
    pub fn is_expired(&self, kind: CredentialKind) -> bool {
        self.slot(kind).is_expired(self.now_millis())
    }

    /// Current value, possibly stale. Check [`is_expired`](Self::is_expired) first.
    pub fn get(&self, kind: CredentialKind) -> Option<SecretString> {
        self.slot(kind).value()
    }

    /// Overwrite the value without touching the expiry.
    pub fn set(&self, kind: CredentialKind, value: impl Into<String>) {
        self.slot(kind)
            .set_value(Some(SecretString::from(value.into())));
    }

    /// Store a freshly issued value; it expires `expires_in_secs - 200` seconds from now.
    pub fn update(&self, kind: CredentialKind, value: impl Into<String>, expires_in_secs: i64) {
        let expires_at = self.slot(kind).update(
            SecretString::from(value.into()),
            expires_in_secs,
            self.now_millis(),
        );
        tracing::debug!(kind = %kind, expires_in_secs, expires_at, "Credential updated");
    }

    /// Force the next expiry check to fail. The cached value is kept.
    pub fn expire(&self, kind: CredentialKind) {
        self.slot(kind).expire();
        tracing::debug!(kind = %kind, "Credential expired");
    }

    pub fn lock_for(&self, kind: CredentialKind) -> CredentialLock {
        self.slot(kind).lock().clone()
    }

    pub fn snapshot(&self, kind: CredentialKind) -> SlotSnapshot {
        self.slot(kind).snapshot()
    }

    // Access token

    pub fn is_access_token_expired(&self) -> bool {
        self.is_expired(CredentialKind::AccessToken)
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.get(CredentialKind::AccessToken)
    }

    pub fn update_access_token(&self, access_token: impl Into<String>, expires_in_secs: i64) {
        self.update(CredentialKind::AccessToken, access_token, expires_in_secs);
    }

    pub fn update_access_token_from(&self, token: &AccessToken) {
        self.update_access_token(token.access_token.clone(), token.expires_in);
    }

    pub fn expire_access_token(&self) {
        self.expire(CredentialKind::AccessToken);
    }

    pub fn access_token_lock(&self) -> CredentialLock {
        self.lock_for(CredentialKind::AccessToken)
    }

    pub fn is_stable_access_token(&self) -> bool {
        self.stable_access_token.load(Ordering::Acquire)
    }

    /// Select the stable token endpoint for future refreshes.
    pub fn use_stable_access_token(&self, enabled: bool) {
        self.stable_access_token.store(enabled, Ordering::Release);
    }

    /// Whether callers should refresh the access token on their own. Always true
    /// for the in-memory store.
    pub fn auto_refresh_token(&self) -> bool {
        true
    }

    // Tickets

    pub fn ticket(&self, ticket: TicketType) -> Option<SecretString> {
        self.get(ticket.into())
    }

    pub fn set_ticket(&self, ticket: TicketType, value: impl Into<String>) {
        self.set(ticket.into(), value);
    }

    pub fn is_ticket_expired(&self, ticket: TicketType) -> bool {
        self.is_expired(ticket.into())
    }

    pub fn update_ticket(&self, ticket: TicketType, value: impl Into<String>, expires_in_secs: i64) {
        self.update(ticket.into(), value, expires_in_secs);
    }

    pub fn expire_ticket(&self, ticket: TicketType) {
        self.expire(ticket.into());
    }

    pub fn ticket_lock(&self, ticket: TicketType) -> CredentialLock {
        self.lock_for(ticket.into())
    }

    // Configuration

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<AccountConfig> {
        self.config.read().clone()
    }

    pub fn replace_config(&self, config: AccountConfig) {
        let _writer = self.config_writer.lock();
        *self.config.write() = Arc::new(config);
    }

    /// Copy-on-write edit. Readers see either the old or the new configuration.
    ///
    /// `f` runs without the read/write lock held, so it may read the store
    /// (`config()`, `app_id()`, `{:?}`). Writers are serialized; calling
    /// `update_config` or `replace_config` from inside `f` deadlocks.
    pub fn update_config(&self, f: impl FnOnce(&mut AccountConfig)) {
        let _writer = self.config_writer.lock();
        let mut next = AccountConfig::clone(&self.config());
        f(&mut next);
        *self.config.write() = Arc::new(next);
    }

    pub fn app_id(&self) -> String {
        self.config.read().app_id.clone()
    }

    pub fn secret(&self) -> Option<SecretString> {
        self.config.read().secret.clone()
    }

    pub fn token(&self) -> Option<SecretString> {
        self.config.read().token.clone()
    }

    pub fn aes_key(&self) -> Option<SecretString> {
        self.config.read().aes_key.clone()
    }

    pub fn host_config(&self) -> Option<HostConfig> {
        self.config.read().host_config.clone()
    }

    pub fn set_host_config(&self, host_config: Option<HostConfig>) {
        self.update_config(|c| c.host_config = host_config);
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.read().retry
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.config.read().tmp_dir_or_default()
    }

    /// Token endpoint honoring the stable-token flag and host overrides.
    pub fn access_token_url(&self) -> String {
        let config = self.config();
        let hosts = config.host_config.as_ref();
        if self.is_stable_access_token() {
            endpoint::stable_access_token_url(hosts)
        } else {
            use secrecy::ExposeSecret;
            let secret = config
                .secret
                .as_ref()
                .map(|s| s.expose_secret())
                .unwrap_or_default();
            endpoint::access_token_url(hosts, &config.app_id, secret)
        }
    }

    pub fn ticket_url(&self, ticket: TicketType) -> String {
        endpoint::ticket_url(self.config().host_config.as_ref(), ticket)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("config", &self.config())
            .field("slots", &self.slots)
            .field("stable_access_token", &self.is_stable_access_token())
            .finish()
    }
}

/// JSON view of the non-secret configuration.
impl fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&*self.config()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
