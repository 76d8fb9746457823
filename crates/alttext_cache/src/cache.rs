//! Upload cache implementation.

use alttext_core::RemoteHandle;
use alttext_error::AltTextResult;
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

/// Compute the cache key for a payload.
///
/// The key is the lowercase hex SHA-256 of the payload bytes followed by the
/// MIME type bytes, so identical bytes declared under different types are
/// cached separately.
///
/// # Examples
///
/// ```
/// use alttext_cache::cache_key;
///
/// let a = cache_key(b"same bytes", "video/mp4");
/// let b = cache_key(b"same bytes", "video/webm");
/// assert_ne!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn cache_key(data: &[u8], mime_type: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(mime_type.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A remembered upload.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    key: String,
    handle: RemoteHandle,
    inserted_at: Instant,
}

impl CacheEntry {
    /// Whether the entry has outlived `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Configuration for the upload cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct UploadCacheConfig {
    /// How long an uploaded object stays reusable (seconds)
    #[serde(default = "default_ttl_secs")]
    ttl_secs: u64,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_enabled() -> bool {
    true
}

impl Default for UploadCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            enabled: default_enabled(),
        }
    }
}

/// Content-addressed store of uploaded objects with time-based expiry.
///
/// Shared between concurrent requests behind an `Arc`. The map lock guards
/// synchronous lookups and inserts only; it is never held while an upload is
/// in flight. Two concurrent misses on the same key therefore both upload,
/// and the later insert wins.
///
/// # Example
///
/// ```
/// use alttext_cache::{UploadCache, UploadCacheConfig};
/// use alttext_core::RemoteHandle;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = UploadCache::new(UploadCacheConfig::default());
///
/// let handle = cache
///     .get_or_upload(b"clip", "video/mp4", || async {
///         Ok(RemoteHandle {
///             name: "files/abc".into(),
///             uri: "https://example.test/files/abc".into(),
///             mime_type: "video/mp4".into(),
///         })
///     })
///     .await
///     .unwrap();
///
/// assert_eq!(handle.name, "files/abc");
/// assert_eq!(cache.len(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct UploadCache {
    config: UploadCacheConfig,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl UploadCache {
    /// Create a cache with the given configuration.
    pub fn new(config: UploadCacheConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            enabled = config.enabled,
            "Creating new UploadCache"
        );
        Self {
            ttl: Duration::from_secs(config.ttl_secs),
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache with an explicit TTL, bypassing whole-second config.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            config: UploadCacheConfig::default().with_ttl_secs(ttl.as_secs()),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this cache was built from.
    pub fn config(&self) -> &UploadCacheConfig {
        &self.config
    }

    /// Return a live handle for `key`, evicting it if it has expired.
    pub fn lookup(&self, key: &str) -> Option<RemoteHandle> {
        if !self.config.enabled {
            return None;
        }

        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;
        if entry.is_expired(self.ttl) {
            tracing::debug!(key, "Cache entry expired, removing");
            entries.remove(key);
            return None;
        }
        Some(entry.handle.clone())
    }

    /// Store a handle under `key`, overwriting any previous entry.
    pub fn insert(&self, key: String, handle: RemoteHandle) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let entry = CacheEntry {
            key: key.clone(),
            handle,
            inserted_at: Instant::now(),
        };
        let replaced = self.entries.lock().insert(key, entry).is_some();
        tracing::debug!(replaced, "Inserted entry into upload cache");
    }

    /// Return the cached handle for this payload, uploading it on a miss.
    ///
    /// `upload` runs only when there is no live entry. A successful upload
    /// is remembered; a failed one leaves the cache untouched and its error
    /// is returned as-is.
    #[tracing::instrument(skip(self, data, upload), fields(size = data.len(), cache_hit = tracing::field::Empty))]
    pub async fn get_or_upload<F, Fut>(
        &self,
        data: &[u8],
        mime_type: &str,
        upload: F,
    ) -> AltTextResult<RemoteHandle>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AltTextResult<RemoteHandle>>,
    {
        let key = cache_key(data, mime_type);

        if let Some(handle) = self.lookup(&key) {
            tracing::Span::current().record("cache_hit", true);
            tracing::debug!(name = %handle.name, "Reusing uploaded object");
            return Ok(handle);
        }
        tracing::Span::current().record("cache_hit", false);

        let handle = upload().await?;
        self.insert(key, handle.clone());
        Ok(handle)
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = entries.len(), "Purged expired uploads");
        }
        removed
    }

    /// Drop all entries.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        tracing::info!(cleared = count, "Cleared upload cache");
    }

    /// Number of stored entries, expired ones included until observed.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for UploadCache {
    fn default() -> Self {
        Self::new(UploadCacheConfig::default())
    }
}
