//! Bounded in-memory chat history

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Maximum number of exchanges retained; older entries are evicted first.
pub const HISTORY_CAPACITY: usize = 100;

/// One completed chat turn: the user's input and the extracted reply.
///
/// Created by `ChatManager` after a successful inference round and never
/// mutated afterwards. `request_id` is absent when the endpoint did not
/// assign one; it serializes as `null` to match the frontend contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user_message: String,
    pub assistant_message: String,
    pub timestamp: String,
    pub request_id: Option<String>,
}

/// Append-only, capacity-bounded buffer of past exchanges.
///
/// A single lock guards append/list/clear; concurrent chat requests land in
/// completion order. `list` returns a snapshot that does not observe later
/// mutations.
pub struct HistoryStore {
    entries: RwLock<VecDeque<ChatExchange>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Add an exchange to the end, evicting from the front past capacity.
    pub async fn append(&self, exchange: ChatExchange) {
        let mut entries = self.entries.write().await;
        entries.push_back(exchange);
        while entries.len() > HISTORY_CAPACITY {
            entries.pop_front();
        }
    }

    /// Snapshot of all current exchanges, oldest first.
    pub async fn list(&self) -> Vec<ChatExchange> {
        self.entries.read().await.iter().cloned().collect()
    }

    /// Remove all exchanges. No-op when already empty.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(n: usize) -> ChatExchange {
        ChatExchange {
            user_message: format!("question {}", n),
            assistant_message: format!("answer {}", n),
            timestamp: format!("2026-08-06T12:00:{:02}+00:00", n % 60),
            request_id: Some(format!("req-{}", n)),
        }
    }

    #[tokio::test]
    async fn test_append_preserves_insertion_order() {
        let store = HistoryStore::new();
        for n in 0..5 {
            store.append(exchange(n)).await;
        }

        let listed = store.list().await;
        assert_eq!(listed.len(), 5);
        for (n, entry) in listed.iter().enumerate() {
            assert_eq!(entry.user_message, format!("question {}", n));
        }
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_first() {
        let store = HistoryStore::new();
        for n in 0..HISTORY_CAPACITY + 25 {
            store.append(exchange(n)).await;
        }

        let listed = store.list().await;
        assert_eq!(listed.len(), HISTORY_CAPACITY);
        // The first 25 are gone; the buffer starts at exchange 25
        assert_eq!(listed[0].user_message, "question 25");
        assert_eq!(
            listed.last().unwrap().user_message,
            format!("question {}", HISTORY_CAPACITY + 24)
        );
    }

    #[tokio::test]
    async fn test_exactly_at_capacity_keeps_everything() {
        let store = HistoryStore::new();
        for n in 0..HISTORY_CAPACITY {
            store.append(exchange(n)).await;
        }

        let listed = store.list().await;
        assert_eq!(listed.len(), HISTORY_CAPACITY);
        assert_eq!(listed[0].user_message, "question 0");
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let store = HistoryStore::new();
        for n in 0..10 {
            store.append(exchange(n)).await;
        }

        store.clear().await;
        assert!(store.list().await.is_empty());

        // Clearing an empty store is a no-op, and the store stays usable
        store.clear().await;
        store.append(exchange(0)).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_returns_snapshot() {
        let store = HistoryStore::new();
        store.append(exchange(0)).await;

        let snapshot = store.list().await;
        store.append(exchange(1)).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list().await.len(), 2);
    }
}
