//! Row subscription fan-out shared by the store adapters.

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use crate::infrastructure::ports::{RowFilter, RowSubscription};

struct Subscriber {
    table: String,
    filter: RowFilter,
    sender: mpsc::UnboundedSender<Value>,
}

/// Tracks live subscriptions and delivers written rows to the matching ones.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, table: &str, filter: RowFilter) -> RowSubscription {
        let (sender, subscription) = RowSubscription::channel();
        self.subscribers.lock().await.push(Subscriber {
            table: table.to_string(),
            filter,
            sender,
        });
        subscription
    }

    /// Deliver `row` to every subscriber on `table` whose filter matches.
    /// Subscribers whose receiver was dropped are pruned.
    pub async fn notify(&self, table: &str, row: &Value) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.retain(|subscriber| {
            if subscriber.table != table || !subscriber.filter.matches(row) {
                return !subscriber.sender.is_closed();
            }
            subscriber.sender.send(row.clone()).is_ok()
        });
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}
