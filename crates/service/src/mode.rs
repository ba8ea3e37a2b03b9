//! Storage mode resolution.
//!
//! An authenticated identity always means remote mode; everything else,
//! including an auth provider that is down, resolves local. A fresh local
//! profile that has never been signed in gets the demo dataset exactly once.

use std::sync::Arc;

use studykeep_core::StorageMode;
use studykeep_storage::keys;
use studykeep_storage::{seed_demo_data, KvStore, LocalStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::AuthProvider;

pub struct ModeResolver {
    auth: Arc<dyn AuthProvider>,
    kv: Arc<dyn KvStore>,
    local: LocalStore,
}

impl ModeResolver {
    pub fn new(auth: Arc<dyn AuthProvider>, kv: Arc<dyn KvStore>, local: LocalStore) -> Self {
        Self { auth, kv, local }
    }

    /// Decide the storage mode for the current moment. Never fails: an auth
    /// outage degrades to local so the app keeps working offline.
    pub async fn resolve(&self) -> StorageMode {
        match self.auth.current_identity().await {
            Ok(Some(identity)) => {
                // An account session overrides any cached preference.
                self.kv.remove(keys::STORAGE_MODE);
                self.kv.set(keys::PREVIOUSLY_AUTHENTICATED, "true");
                tracing::debug!(user_id = %identity.user_id, "resolved remote mode");
                StorageMode::Remote
            },
            Ok(None) => self.resolve_local().await,
            Err(e) => {
                tracing::warn!(error = %e, "auth provider unreachable, staying local");
                self.resolve_local().await
            },
        }
    }

    async fn resolve_local(&self) -> StorageMode {
        let initialized = self.kv.get(keys::STORAGE_INITIALIZED).is_some();
        let was_authenticated = self.kv.get(keys::PREVIOUSLY_AUTHENTICATED).is_some();
        if !initialized && !was_authenticated {
            // First launch on this profile: give the user something to look
            // at. A returning signed-out user keeps an empty local store.
            match seed_demo_data(&self.local).await {
                Ok(counts) => tracing::info!(
                    courses = counts.courses,
                    notes = counts.notes,
                    entries = counts.entries,
                    "seeded demo data for first local run"
                ),
                Err(e) => tracing::warn!(error = %e, "demo seed failed, starting empty"),
            }
            self.kv.set(keys::STORAGE_INITIALIZED, "true");
        }
        StorageMode::Local
    }

    /// Record an explicit mode choice, e.g. "continue without an account".
    /// Signing in overrides and removes the cached preference.
    pub fn set_mode_preference(&self, mode: StorageMode) {
        self.kv.set(keys::STORAGE_MODE, &mode.to_string());
    }

    /// Explicit account reset: the next anonymous launch seeds again.
    pub fn clear_previous_authentication(&self) {
        self.kv.remove(keys::PREVIOUSLY_AUTHENTICATED);
    }

    /// Re-resolve on every sign-in/sign-out and publish the result. The
    /// returned receiver always holds the latest resolved mode; the task ends
    /// when the receiver side is dropped or the auth event channel closes.
    pub fn watch(self: Arc<Self>) -> (watch::Receiver<StorageMode>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(StorageMode::Local);
        let handle = tokio::spawn(async move {
            let mut events = self.auth.events();
            let initial = self.resolve().await;
            if tx.send(initial).is_err() {
                return;
            }
            loop {
                match events.recv().await {
                    Ok(_) => {
                        let mode = self.resolve().await;
                        if tx.send(mode).is_err() {
                            return;
                        }
                    },
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth events lagged, re-resolving");
                        let mode = self.resolve().await;
                        if tx.send(mode).is_err() {
                            return;
                        }
                    },
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
                }
            }
        });
        (rx, handle)
    }
}
