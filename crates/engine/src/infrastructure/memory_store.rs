//! In-memory remote store.
//!
//! Stands in for the hosted row store when running offline and in tests.
//! Every upsert is recorded so tests can assert on what was pushed.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RemoteStore, RowFilter, RowSubscription, StoreError};
use crate::infrastructure::rows::{merge_columns, row_user_id};
use crate::infrastructure::subscriptions::SubscriberRegistry;

/// Upserts as (table, row) in arrival order.
pub type UpsertLog = Vec<(String, Value)>;

#[derive(Default)]
pub struct InMemoryRemoteStore {
    // table -> user_id -> row
    rows: RwLock<HashMap<String, HashMap<String, Value>>>,
    upserts: RwLock<UpsertLog>,
    subscribers: SubscriberRegistry,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row without recording it as an upsert or notifying subscribers.
    pub async fn seed(&self, table: &str, row: Value) -> Result<(), StoreError> {
        let user_id = row_user_id(table, &row)?;
        self.rows
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .insert(user_id, row);
        Ok(())
    }

    pub async fn upserts(&self) -> UpsertLog {
        self.upserts.read().await.clone()
    }

    pub async fn row(&self, table: &str, user_id: &str) -> Option<Value> {
        self.rows
            .read()
            .await
            .get(table)
            .and_then(|rows| rows.get(user_id))
            .cloned()
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn upsert(&self, table: &str, row: Value) -> Result<(), StoreError> {
        let user_id = row_user_id(table, &row)?;
        self.upserts
            .write()
            .await
            .push((table.to_string(), row.clone()));

        let merged = {
            let mut rows = self.rows.write().await;
            let table_rows = rows.entry(table.to_string()).or_default();
            let merged = merge_columns(table_rows.remove(&user_id), row)?;
            table_rows.insert(user_id, merged.clone());
            merged
        };

        self.subscribers.notify(table, &merged).await;
        Ok(())
    }

    async fn select_one(&self, table: &str, filter: &RowFilter) -> Result<Option<Value>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .get(table)
            .and_then(|rows| rows.values().find(|row| filter.matches(row)))
            .cloned())
    }

    async fn subscribe(&self, table: &str, filter: RowFilter) -> Result<RowSubscription, StoreError> {
        Ok(self.subscribers.register(table, filter).await)
    }
}
