//! Admin connection registry
//!
//! Lock-free map of connection id to sender. The registry is an explicit
//! value passed in at construction (held by `AppState`), so tests can build
//! their own and assert on the receiving end without a transport.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Registry of live admin notification channels
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<u64, mpsc::UnboundedSender<String>>,
    next_id: AtomicU64,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection; returns its id and the receiving end
    pub fn register(&self) -> (u64, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.insert(id, tx);
        tracing::debug!(connection = id, total = self.channels.len(), "Admin channel registered");
        (id, rx)
    }

    pub fn unregister(&self, id: u64) {
        self.channels.remove(&id);
        tracing::debug!(connection = id, total = self.channels.len(), "Admin channel removed");
    }

    /// Broadcast an event to every live connection.
    ///
    /// The payload is serialized once. Dead senders are pruned; failures are
    /// logged and swallowed, broadcast must never fail the caller.
    pub fn broadcast<T: Serialize>(&self, event: &str, payload: &T) {
        let text = match serde_json::to_string(&serde_json::json!({
            "event": event,
            "data": payload,
        })) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize notification");
                return;
            }
        };

        let mut dead = Vec::new();
        for entry in self.channels.iter() {
            if entry.value().send(text.clone()).is_err() {
                dead.push(*entry.key());
            }
        }
        for id in dead {
            self.channels.remove(&id);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.channels.len()
    }
}
