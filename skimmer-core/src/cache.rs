// Cache-aside reads over a KeyValueStore

use crate::store::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use skimmer_scanner::Page;
use std::future::Future;
use tracing::{debug, warn};

/// Values that can be served from the cache and flagged as such.
pub trait Cacheable: Serialize + DeserializeOwned {
    fn mark_cached(&mut self);
}

impl Cacheable for Page {
    fn mark_cached(&mut self) {
        Page::mark_cached(self);
    }
}

/// Read-through / write-through wrapper around a [`KeyValueStore`].
///
/// Store failures never reach the caller: a failed or undecodable read is a
/// miss and a failed write is logged and dropped. There is no invalidation
/// and no de-duplication of concurrent misses; the last write wins.
pub struct CacheAside<S> {
    store: S,
}

impl<S: KeyValueStore> CacheAside<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the cached value for `key` when `use_cache` is set and a
    /// decodable entry exists; otherwise computes, stores and returns a fresh
    /// value. The boolean is true only for values served from the store.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl_minutes: u64,
        use_cache: bool,
        compute: F,
    ) -> (T, bool)
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if use_cache && let Some(mut cached) = self.read::<T>(key) {
            debug!("Cache hit for {}", key);
            cached.mark_cached();
            return (cached, true);
        }

        debug!("Computing fresh value for {}", key);
        let value = compute().await;
        self.write(key, &value, ttl_minutes);
        (value, false)
    }

    /// Reads and decodes `key`, treating every failure as a miss.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Encodes `value` as indented JSON and stores it. Returns whether the
    /// write succeeded.
    pub fn write<T: Serialize>(&self, key: &str, value: &T, ttl_minutes: u64) -> bool {
        let bytes = match serde_json::to_vec_pretty(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not encode cache entry {}: {}", key, e);
                return false;
            }
        };

        match self.store.set(key, &bytes, ttl_minutes) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write failed for {}: {}", key, e);
                false
            }
        }
    }
}
