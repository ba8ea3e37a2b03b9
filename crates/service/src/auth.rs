//! Auth collaborator boundary.
//!
//! The service layer only needs to know who is signed in right now and when
//! that changes. Real OAuth lives outside this workspace behind the
//! `AuthProvider` trait; `StaticAuth` covers tests and embedding hosts.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Provider could not be reached or answered with a transport error.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// The signed-in principal. `user_id` doubles as the remote tenant key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` means anonymous; `Err` means the provider itself is down,
    /// which callers treat the same as anonymous (fail-open).
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    /// Sign-in/sign-out notifications. Dropping the receiver unsubscribes.
    fn events(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Fixed-answer provider: anonymous, signed in as one user, or failing.
/// State can be flipped at runtime to drive transition tests.
#[derive(Debug)]
pub struct StaticAuth {
    identity: Mutex<Option<Identity>>,
    failing: Mutex<bool>,
    events: broadcast::Sender<AuthEvent>,
}

impl StaticAuth {
    pub fn anonymous() -> Self {
        Self {
            identity: Mutex::new(None),
            failing: Mutex::new(false),
            events: broadcast::channel(EVENT_CAPACITY).0,
        }
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let auth = Self::anonymous();
        if let Ok(mut identity) = auth.identity.lock() {
            *identity = Some(Identity { user_id: user_id.into() });
        }
        auth
    }

    /// Provider that errors on every identity lookup.
    pub fn failing() -> Self {
        let auth = Self::anonymous();
        if let Ok(mut failing) = auth.failing.lock() {
            *failing = true;
        }
        auth
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        if let Ok(mut identity) = self.identity.lock() {
            *identity = Some(Identity { user_id: user_id.into() });
        }
        let _ = self.events.send(AuthEvent::SignedIn);
    }

    pub fn sign_out(&self) {
        if let Ok(mut identity) = self.identity.lock() {
            *identity = None;
        }
        let _ = self.events.send(AuthEvent::SignedOut);
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        let failing = self.failing.lock().map(|f| *f).unwrap_or(false);
        if failing {
            return Err(AuthError::Unavailable("static provider set to fail".to_owned()));
        }
        Ok(self.identity.lock().map(|i| i.clone()).unwrap_or(None))
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
