//! Download token store
//!
//! Process-local registry mapping opaque one-time tokens to generated export
//! files. A token is valid for exactly one retrieval within the TTL; it is
//! removed on first lookup or on expiry detection, whichever comes first.
//! Tokens do not survive a restart and are invisible to sibling processes;
//! deferred downloads need session affinity in a scaled deployment.
//!
//! The store is a trait so a shared backend can replace the in-memory map
//! without touching the export engine.

use dashmap::DashMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::utils::time::now_millis;

/// Metadata for one generated export file
#[derive(Debug, Clone)]
pub struct DownloadEntry {
    pub path: PathBuf,
    /// Attachment filename presented to the browser
    pub filename: String,
    pub mime_type: String,
    /// Absolute expiry instant, epoch millis
    pub expires_at: i64,
}

/// Outcome of a token redemption
#[derive(Debug)]
pub enum TakeOutcome {
    /// Token was live; it has now been invalidated
    Valid(DownloadEntry),
    /// Token existed but its TTL elapsed; the entry is returned so the
    /// caller can clean up the file
    Expired(DownloadEntry),
    Missing,
}

/// Key-value capability the export engine depends on:
/// put-with-expiry and get-and-invalidate.
pub trait TokenStore: Send + Sync {
    /// Register an entry; returns the opaque token
    fn put(&self, entry: DownloadEntry) -> String;

    /// Redeem a token. Any outcome other than `Valid` leaves the token
    /// unusable afterwards.
    fn take(&self, token: &str) -> TakeOutcome;

    /// Drop expired entries, returning them for file cleanup
    fn purge_expired(&self) -> Vec<DownloadEntry>;
}

/// In-memory store, the only shipped backend
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: DashMap<String, DownloadEntry>,
    ttl_millis: i64,
}

impl MemoryTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_millis: ttl.as_millis() as i64,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn put(&self, mut entry: DownloadEntry) -> String {
        let token = Uuid::new_v4().simple().to_string();
        entry.expires_at = now_millis() + self.ttl_millis;
        self.entries.insert(token.clone(), entry);
        token
    }

    fn take(&self, token: &str) -> TakeOutcome {
        match self.entries.remove(token) {
            Some((_, entry)) if entry.expires_at >= now_millis() => TakeOutcome::Valid(entry),
            Some((_, entry)) => TakeOutcome::Expired(entry),
            None => TakeOutcome::Missing,
        }
    }

    fn purge_expired(&self) -> Vec<DownloadEntry> {
        let now = now_millis();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().expires_at < now)
            .map(|e| e.key().clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|token| self.entries.remove(&token).map(|(_, entry)| entry))
            .collect()
    }
}
