//! Session-backed authentication adapter.
//!
//! Holds the current [`AuthSession`] in a watch channel so sign-in and
//! sign-out are observable by the sync gateway.

use tokio::sync::watch;

use crate::infrastructure::ports::{AuthPort, AuthSession};

pub struct SessionAuth {
    sender: watch::Sender<AuthSession>,
}

impl SessionAuth {
    pub fn new(initial: AuthSession) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn anonymous() -> Self {
        Self::new(AuthSession::anonymous())
    }

    /// Build from an optional configured identity; blank identities stay anonymous.
    pub fn from_identity(user_id: Option<String>) -> Self {
        match user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Self::new(AuthSession::signed_in(id)),
            None => Self::anonymous(),
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let session = AuthSession::signed_in(user_id);
        tracing::info!(user_id = ?session.user_id, "Signed in");
        self.sender.send_replace(session);
    }

    pub fn sign_out(&self) {
        tracing::info!("Signed out");
        self.sender.send_replace(AuthSession::anonymous());
    }
}

impl AuthPort for SessionAuth {
    fn session(&self) -> AuthSession {
        self.sender.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<AuthSession> {
        self.sender.subscribe()
    }
}
