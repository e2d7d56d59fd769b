//! Auth session state. A single boolean lives in a `watch` channel so the shell
//! (or anything else holding a receiver) is told when it flips, and is mirrored
//! to the key-value store under [`AUTH_KEY`]. The in-memory flag and the
//! persisted marker agree after every `login`, `logout` and `check_auth`.

use super::storage::KeyValueStore;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Storage key holding the auth marker.
pub const AUTH_KEY: &str = "authenticated";
/// The only marker value that counts as authenticated.
pub const AUTH_MARKER: &str = "true";

#[derive(Debug)]
pub struct AuthStore<S> {
    storage: S,
    state: watch::Sender<bool>,
}

impl<S: KeyValueStore> AuthStore<S> {
    /// Builds an unauthenticated store; call `check_auth` to hydrate.
    pub fn new(storage: S) -> Self {
        let (state, _) = watch::channel(false);
        Self { storage, state }
    }

    /// Builds the store and hydrates it from storage once.
    pub fn hydrate(storage: S) -> Self {
        let store = Self::new(storage);
        store.check_auth();
        store
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    /// Receivers are notified only when the flag actually changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Marks the session authenticated and persists the marker. A failed write
    /// is logged and otherwise ignored.
    pub fn login(&self) {
        self.set(true);
        if let Err(err) = self.storage.set(AUTH_KEY, AUTH_MARKER) {
            warn!("Failed to persist auth marker: {err}");
        }
    }

    /// Clears the session and removes the marker. A failed removal is logged
    /// and otherwise ignored.
    pub fn logout(&self) {
        self.set(false);
        if let Err(err) = self.storage.remove(AUTH_KEY) {
            warn!("Failed to remove auth marker: {err}");
        }
    }

    /// Re-reads the marker; only the exact value `"true"` authenticates.
    pub fn check_auth(&self) -> bool {
        let marker = self.storage.get(AUTH_KEY).unwrap_or_else(|err| {
            warn!("Failed to read auth marker: {err}");
            None
        });
        let authenticated = marker.as_deref() == Some(AUTH_MARKER);
        self.set(authenticated);
        authenticated
    }

    fn set(&self, authenticated: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current == authenticated {
                false
            } else {
                *current = authenticated;
                true
            }
        });

        if changed {
            debug!(authenticated, "auth state changed");
        }
    }
}
