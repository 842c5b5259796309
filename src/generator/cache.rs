// src/generator/cache.rs

use std::path::PathBuf;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How long a fetched ABI is reused before asking Etherscan again.
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: i64,
    abi: String,
}

/// On-disk cache of verified ABIs, one file per `(chain_id, address)`.
#[derive(Debug, Clone)]
pub struct AbiCache {
    root: PathBuf,
    ttl: Duration,
}

impl AbiCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn entry_path(&self, chain_id: u64, address: &str) -> PathBuf {
        self.root
            .join(chain_id.to_string())
            .join(format!("{}.json", address.to_lowercase()))
    }

    /// Returns the cached ABI text if present and fresh. Unreadable entries
    /// count as misses.
    pub async fn get(&self, chain_id: u64, address: &str) -> Option<String> {
        let path = self.entry_path(chain_id, address);
        let bytes = tokio::fs::read(&path).await.ok()?;
        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        let age = Utc::now().timestamp() - entry.fetched_at;
        if age > self.ttl.num_seconds() {
            debug!("Cache entry {} expired ({}s old)", path.display(), age);
            return None;
        }
        Some(entry.abi)
    }

    pub async fn put(&self, chain_id: u64, address: &str, abi: &str) -> std::io::Result<()> {
        let path = self.entry_path(chain_id, address);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entry = CacheEntry {
            fetched_at: Utc::now().timestamp(),
            abi: abi.to_string(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        tokio::fs::write(&path, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ADDRESS: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempdir().unwrap();
        let cache = AbiCache::new(dir.path());

        assert!(cache.get(1, ADDRESS).await.is_none());
        cache.put(1, ADDRESS, "[]").await.unwrap();

        assert_eq!(cache.get(1, ADDRESS).await.as_deref(), Some("[]"));
        // Keys are case-insensitive and scoped per chain
        assert_eq!(cache.get(1, &ADDRESS.to_lowercase()).await.as_deref(), Some("[]"));
        assert!(cache.get(10, ADDRESS).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_misses() {
        let dir = tempdir().unwrap();
        let cache = AbiCache::new(dir.path()).with_ttl(Duration::seconds(-1));

        cache.put(1, ADDRESS, "[]").await.unwrap();
        assert!(cache.get(1, ADDRESS).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = AbiCache::new(dir.path());

        let path = dir.path().join("1").join(format!("{}.json", ADDRESS.to_lowercase()));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not json").unwrap();

        assert!(cache.get(1, ADDRESS).await.is_none());
    }
}
