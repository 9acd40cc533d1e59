//! Per-kind credential slot: cached value, expiry and refresh lock.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use secrecy::SecretString;

use super::CredentialKind;

/// Seconds shaved off every advertised lifetime so the cache refreshes
/// ahead of the remote expiry.
pub const SAFETY_MARGIN_SECS: i64 = 200;

/// Absolute expiry for a credential issued at `now_millis` with the given lifetime.
pub fn expiry_millis(now_millis: i64, expires_in_secs: i64) -> i64 {
    let lifetime_millis = expires_in_secs
        .saturating_sub(SAFETY_MARGIN_SECS)
        .saturating_mul(1000);
    now_millis.saturating_add(lifetime_millis)
}

/// Handle to the reentrant refresh lock of one credential kind.
///
/// Cloning yields another handle to the same lock. The store never takes
/// this lock itself; callers use it to serialize refreshes.
#[derive(Clone)]
pub struct CredentialLock {
    kind: CredentialKind,
    inner: Arc<ReentrantMutex<()>>,
}

pub type CredentialLockGuard<'a> = ReentrantMutexGuard<'a, ()>;

impl CredentialLock {
    fn new(kind: CredentialKind) -> Self {
        Self {
            kind,
            inner: Arc::new(ReentrantMutex::new(())),
        }
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Block until the lock is held by the current thread.
    pub fn lock(&self) -> CredentialLockGuard<'_> {
        self.inner.lock()
    }

    pub fn try_lock(&self) -> Option<CredentialLockGuard<'_>> {
        self.inner.try_lock()
    }

    pub fn try_lock_for(&self, timeout: Duration) -> Option<CredentialLockGuard<'_>> {
        self.inner.try_lock_for(timeout)
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Whether both handles refer to the same underlying lock.
    pub fn ptr_eq(&self, other: &CredentialLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CredentialLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialLock")
            .field("kind", &self.kind)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Value and expiry observed together.
#[derive(Clone)]
pub struct SlotSnapshot {
    pub value: Option<SecretString>,
    pub expires_at_millis: i64,
}

impl SlotSnapshot {
    /// True from `expires_at` itself on.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at_millis
    }
}

impl fmt::Debug for SlotSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotSnapshot")
            .field("has_value", &self.value.is_some())
            .field("expires_at_millis", &self.expires_at_millis)
            .finish()
    }
}

#[derive(Default)]
struct SlotState {
    value: Option<SecretString>,
    expires_at_millis: i64,
}

pub(crate) struct CredentialSlot {
    state: RwLock<SlotState>,
    lock: CredentialLock,
}

impl CredentialSlot {
    pub(crate) fn new(kind: CredentialKind) -> Self {
        Self {
            state: RwLock::new(SlotState::default()),
            lock: CredentialLock::new(kind),
        }
    }

    /// Expired from the exact expiry millisecond on (`now >= expires_at`),
    /// so a lifetime of at most 200 s is expired even before the clock ticks.
    pub(crate) fn is_expired(&self, now_millis: i64) -> bool {
        now_millis >= self.state.read().expires_at_millis
    }

    pub(crate) fn value(&self) -> Option<SecretString> {
        self.state.read().value.clone()
    }

    /// Replace the value only; expiry is left as is.
    pub(crate) fn set_value(&self, value: Option<SecretString>) {
        self.state.write().value = value;
    }

    /// Write value and expiry as one pair. Returns the new expiry.
    pub(crate) fn update(
        &self,
        value: SecretString,
        expires_in_secs: i64,
        now_millis: i64,
    ) -> i64 {
        let expires_at_millis = expiry_millis(now_millis, expires_in_secs);
        let mut state = self.state.write();
        state.value = Some(value);
        state.expires_at_millis = expires_at_millis;
        expires_at_millis
    }

    pub(crate) fn expire(&self) {
        self.state.write().expires_at_millis = 0;
    }

    pub(crate) fn snapshot(&self) -> SlotSnapshot {
        let state = self.state.read();
        SlotSnapshot {
            value: state.value.clone(),
            expires_at_millis: state.expires_at_millis,
        }
    }

    pub(crate) fn lock(&self) -> &CredentialLock {
        &self.lock
    }
}

impl fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("CredentialSlot")
            .field("kind", &self.lock.kind)
            .field("has_value", &state.value.is_some())
            .field("expires_at_millis", &state.expires_at_millis)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_expiry_applies_safety_margin() {
        assert_eq!(expiry_millis(1_000, 7200), 1_000 + 7_000_000);
        assert_eq!(expiry_millis(1_000, 200), 1_000);
        assert_eq!(expiry_millis(1_000, 0), 1_000 - 200_000);
    }

    #[test]
    fn test_expiry_saturates() {
        assert_eq!(expiry_millis(i64::MAX - 10, 7200), i64::MAX);
        assert_eq!(expiry_millis(0, i64::MIN), i64::MIN);
    }

    #[test]
    fn test_new_slot_is_expired() {
        let slot = CredentialSlot::new(CredentialKind::AccessToken);
        assert!(slot.is_expired(0));
        assert!(slot.value().is_none());
    }

    #[test]
    fn test_update_then_expire_keeps_value() {
        let slot = CredentialSlot::new(CredentialKind::SdkTicket);
        let expires_at = slot.update(SecretString::from("t1"), 7200, 10_000);
        assert_eq!(expires_at, 7_010_000);
        assert!(!slot.is_expired(10_000));

        slot.expire();
        assert!(slot.is_expired(10_000));
        assert_eq!(slot.value().unwrap().expose_secret(), "t1");
    }

    #[test]
    fn test_expired_at_exact_millisecond() {
        let slot = CredentialSlot::new(CredentialKind::AccessToken);
        let expires_at = slot.update(SecretString::from("tok".to_string()), 300, 0);
        assert_eq!(expires_at, 100_000);
        assert!(!slot.is_expired(expires_at - 1));
        assert!(slot.is_expired(expires_at));
        assert!(slot.snapshot().is_expired_at(expires_at));
    }

    #[test]
    fn test_set_value_leaves_expiry() {
        let slot = CredentialSlot::new(CredentialKind::JsapiTicket);
        slot.set_value(Some(SecretString::from("abc")));
        let snapshot = slot.snapshot();
        assert_eq!(snapshot.expires_at_millis, 0);
        assert!(snapshot.is_expired_at(1));
    }

    #[test]
    fn test_lock_is_reentrant() {
        let slot = CredentialSlot::new(CredentialKind::AccessToken);
        let lock = slot.lock().clone();
        let _outer = lock.lock();
        let inner = lock.try_lock();
        assert!(inner.is_some());
        assert!(lock.is_locked());
    }

    #[test]
    fn test_lock_handles_share_state() {
        let slot = CredentialSlot::new(CredentialKind::WxCardTicket);
        let a = slot.lock().clone();
        let b = slot.lock().clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.kind(), CredentialKind::WxCardTicket);

        let other = CredentialSlot::new(CredentialKind::WxCardTicket);
        assert!(!a.ptr_eq(other.lock()));
    }

    #[test]
    fn test_debug_redacts_value() {
        let slot = CredentialSlot::new(CredentialKind::AccessToken);
        slot.update(SecretString::from("super-secret"), 7200, 0);
        let debug = format!("{:?} {:?}", slot, slot.snapshot());
        assert!(!debug.contains("super-secret"));
    }
}
