//! SQLite-backed remote store.
//!
//! Keeps one JSON row per (table, user) so the engine can run against a local
//! file with the same upsert/select/subscribe contract as the hosted store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{
    ClockPort, RemoteStore, RowFilter, RowSubscription, StoreError, USER_ID_COLUMN,
};
use crate::infrastructure::rows::{merge_columns, row_user_id};
use crate::infrastructure::subscriptions::SubscriberRegistry;

pub struct SqliteRemoteStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
    subscribers: SubscriberRegistry,
}

impl SqliteRemoteStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| StoreError::database("connect", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS remote_rows (
                table_name TEXT NOT NULL,
                user_id TEXT NOT NULL,
                row_json TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (table_name, user_id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::database("create_table", e))?;

        Ok(Self {
            pool,
            clock,
            subscribers: SubscriberRegistry::new(),
        })
    }

    fn parse_row(json: &str) -> Result<Value, StoreError> {
        serde_json::from_str(json).map_err(StoreError::serialization)
    }
}

#[async_trait]
impl RemoteStore for SqliteRemoteStore {
    async fn upsert(&self, table: &str, row: Value) -> Result<(), StoreError> {
        let user_id = row_user_id(table, &row)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::database("upsert", e))?;

        let existing = sqlx::query(
            "SELECT row_json FROM remote_rows WHERE table_name = ? AND user_id = ?",
        )
        .bind(table)
        .bind(&user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::database("upsert", e))?
        .map(|r| Self::parse_row(&r.get::<String, _>("row_json")))
        .transpose()?;

        let merged = merge_columns(existing, row)?;
        let json = serde_json::to_string(&merged).map_err(StoreError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO remote_rows (table_name, user_id, row_json, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(table_name, user_id) DO UPDATE SET
                row_json = excluded.row_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(table)
        .bind(&user_id)
        .bind(json)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::database("upsert", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::database("upsert", e))?;

        self.subscribers.notify(table, &merged).await;
        Ok(())
    }

    async fn select_one(&self, table: &str, filter: &RowFilter) -> Result<Option<Value>, StoreError> {
        if filter.column == USER_ID_COLUMN {
            let row = sqlx::query(
                "SELECT row_json FROM remote_rows WHERE table_name = ? AND user_id = ?",
            )
            .bind(table)
            .bind(&filter.value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database("select_one", e))?;

            return row
                .map(|r| Self::parse_row(&r.get::<String, _>("row_json")))
                .transpose();
        }

        // Other columns live inside the JSON document.
        let rows = sqlx::query("SELECT row_json FROM remote_rows WHERE table_name = ?")
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database("select_one", e))?;

        for row in rows {
            let value = Self::parse_row(&row.get::<String, _>("row_json"))?;
            if filter.matches(&value) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    async fn subscribe(&self, table: &str, filter: RowFilter) -> Result<RowSubscription, StoreError> {
        Ok(self.subscribers.register(table, filter).await)
    }
}
