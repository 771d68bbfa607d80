//! Cache gateway: key-addressed store wrapper with TTL and tag metadata.
//!
//! Every expensive upstream call (rate-limited GitHub reads, paid completion
//! calls) goes through this layer. The concrete byte store is an opaque
//! collaborator behind [`CacheStore`]; this crate ships an in-process
//! [`MemoryStore`] used by default and in tests. TTL is advisory expiry
//! enforced by the store, not by the gateway; tags are stored alongside the
//! payload for coarse invalidation and are not interpreted here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Per-entry write options. `ttl_secs == 0` means the entry is already stale
/// and eligible for eviction on the next read.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    pub ttl_secs: u64,
    pub tags: Vec<String>,
}

impl CacheOptions {
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            tags: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Opaque byte store. Implementations own expiry and per-key atomicity; the
/// gateway makes no read-your-writes promise beyond single-process ordering.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn set(&self, key: &str, payload: Vec<u8>, opts: &CacheOptions);
}

/// Derive a stable cache key from a namespace plus ordered parameter values.
///
/// Each part is length-prefixed before hashing so the derivation is injective
/// in the part list: `("ab", "c")` and `("a", "bc")` hash differently, and
/// swapping two parts always changes the key.
pub fn cache_key<S: AsRef<str>>(namespace: &str, parts: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    for part in parts {
        let bytes = part.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_be_bytes());
        hasher.update(bytes);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(namespace.len() + 1 + 64);
    out.push_str(namespace);
    out.push(':');
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Typed convenience layer over a [`CacheStore`].
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn CacheStore>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.store.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                // A corrupt entry behaves like a miss; the caller refills it.
                warn!(key, error = %e, "cache payload failed to deserialize");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, opts: &CacheOptions) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.store.set(key, bytes, opts).await,
            Err(e) => warn!(key, error = %e, "cache payload failed to serialize"),
        }
    }
}

struct MemoryEntry {
    payload: Vec<u8>,
    expires_at: Option<Instant>,
    tags: Vec<String>,
}

/// In-process store with absolute-deadline expiry. Entries are evicted lazily
/// on read; there is no background sweeper.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry carrying `tag`. Tag semantics live in the store, not
    /// the gateway; this is the coarse invalidation hook.
    pub fn purge_tag(&self, tag: &str) -> usize {
        let mut map = self.inner.lock().expect("memory store mutex poisoned");
        let before = map.len();
        map.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        before - map.len()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut map = self.inner.lock().expect("memory store mutex poisoned");
        let expired = match map.get(key) {
            Some(entry) => entry
                .expires_at
                .is_some_and(|deadline| Instant::now() >= deadline),
            None => return None,
        };
        if expired {
            map.remove(key);
            return None;
        }
        map.get(key).map(|e| e.payload.clone())
    }

    async fn set(&self, key: &str, payload: Vec<u8>, opts: &CacheOptions) {
        let expires_at = Some(Instant::now() + Duration::from_secs(opts.ttl_secs));
        let mut map = self.inner.lock().expect("memory store mutex poisoned");
        map.insert(
            key.to_string(),
            MemoryEntry {
                payload,
                expires_at,
                tags: opts.tags.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_across_calls() {
        let a = cache_key("screenshot", &["https://x", "100", "50"]);
        let b = cache_key("screenshot", &["https://x", "100", "50"]);
        assert_eq!(a, b);
        assert!(a.starts_with("screenshot:"));
    }

    #[test]
    fn key_is_order_sensitive() {
        let a = cache_key("screenshot", &["https://x", "100", "50"]);
        let b = cache_key("screenshot", &["https://x", "50", "100"]);
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_boundary_sensitive() {
        // Length prefixing keeps adjacent parts from gluing together.
        let a = cache_key("ns", &["ab", "c"]);
        let b = cache_key("ns", &["a", "bc"]);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn memory_store_round_trip_and_expiry() {
        let store = MemoryStore::new();
        store
            .set("k", b"payload".to_vec(), &CacheOptions::with_ttl(3600))
            .await;
        assert_eq!(store.get("k").await.as_deref(), Some(&b"payload"[..]));

        store
            .set("stale", b"old".to_vec(), &CacheOptions::with_ttl(0))
            .await;
        assert!(store.get("stale").await.is_none());
    }

    #[tokio::test]
    async fn purge_tag_drops_only_tagged_entries() {
        let store = MemoryStore::new();
        let tagged = CacheOptions::with_ttl(3600).tag("user:octocat");
        let untagged = CacheOptions::with_ttl(3600);
        store.set("a", b"1".to_vec(), &tagged).await;
        store.set("b", b"2".to_vec(), &untagged).await;

        assert_eq!(store.purge_tag("user:octocat"), 1);
        assert!(store.get("a").await.is_none());
        assert!(store.get("b").await.is_some());
    }
}
