//! Short-TTL read-through cache for expensive platform fetches.
//!
//! The GitHub adapter memoizes repository configuration files and per-file
//! blame data keyed by `(owner, repo, ref, path)`. Entries expire after a
//! fixed duration; a miss or expired entry falls through to a live fetch.
//! Writes never fail a request.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[cfg(test)]
#[path = "ttl_tests.rs"]
mod tests;

/// Cache key for repository-scoped fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPathKey {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Git ref (branch or sha) the fetch was resolved against
    pub git_ref: String,
    /// File path within the repository
    pub path: String,
}

impl RepoPathKey {
    /// Builds a key from borrowed parts.
    pub fn new(owner: &str, repo: &str, git_ref: &str, path: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.to_string(),
            path: path.to_string(),
        }
    }
}

/// A time-bounded map of cached values.
///
/// Expired entries are dropped lazily on access; there is no background
/// eviction because entry counts are small (one per fetched file).
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// Creates a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value, resetting its expiry.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        entries.insert(key, (Instant::now(), value));
    }
}
