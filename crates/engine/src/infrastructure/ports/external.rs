//! External collaborator ports (remote row store, authentication).

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use super::error::StoreError;

/// Column every progress row is keyed by.
pub const USER_ID_COLUMN: &str = "user_id";

// =============================================================================
// Remote Store
// =============================================================================

/// Equality predicate on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

impl RowFilter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Rows belonging to one user.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::eq(USER_ID_COLUMN, user_id)
    }

    pub fn matches(&self, row: &Value) -> bool {
        row.get(&self.column).and_then(Value::as_str) == Some(self.value.as_str())
    }
}

/// Stream of rows matching a subscription filter, delivered as they change.
#[derive(Debug)]
pub struct RowSubscription {
    receiver: mpsc::UnboundedReceiver<Value>,
}

impl RowSubscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<Value>) -> Self {
        Self { receiver }
    }

    /// A subscription plus the sender that feeds it.
    pub fn channel() -> (mpsc::UnboundedSender<Value>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self::new(receiver))
    }

    /// Next changed row; `None` once the store drops the subscription.
    pub async fn next(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }
}

/// Row-oriented store of flat JSON documents keyed by user identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert the row, or update the columns it carries on an existing row
    /// with the same `user_id`.
    async fn upsert(&self, table: &str, row: Value) -> Result<(), StoreError>;

    async fn select_one(&self, table: &str, filter: &RowFilter) -> Result<Option<Value>, StoreError>;

    /// Rows written to `table` that match `filter`, from now on.
    async fn subscribe(&self, table: &str, filter: RowFilter) -> Result<RowSubscription, StoreError>;
}

// =============================================================================
// Authentication
// =============================================================================

/// Current authentication state as reported by the auth collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: Option<String>,
    pub logged_in: bool,
}

impl AuthSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            logged_in: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Identity to act as, only when logged in with a non-empty id.
    pub fn authenticated_user(&self) -> Option<&str> {
        if !self.logged_in {
            return None;
        }
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AuthPort: Send + Sync {
    fn session(&self) -> AuthSession;

    /// Observe session changes.
    fn watch(&self) -> watch::Receiver<AuthSession>;
}
