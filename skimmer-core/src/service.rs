// Fetch, extract and cache pages on behalf of the command layer

use crate::cache::CacheAside;
use crate::config::PAGE_TTL_MINUTES;
use crate::store::KeyValueStore;
use serde_json::{Value, json};
use skimmer_scanner::{Fetcher, Page, PageStats, build_page, build_stats};
use tracing::info;

/// How a blog read should treat the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve a stored page when one is available.
    Cached,
    /// Always fetch, then overwrite the stored page.
    Refresh,
}

impl CacheMode {
    /// `"refresh"` bypasses the cache; any other mode reads through it.
    pub fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("refresh") {
            CacheMode::Refresh
        } else {
            CacheMode::Cached
        }
    }

    pub fn use_cache(self) -> bool {
        self == CacheMode::Cached
    }
}

/// Cache key for a page path. The scheme is not part of the key, so the
/// http and https variants of a path share one entry.
pub fn cache_key(path: &str) -> String {
    format!("page:{}", path)
}

pub fn page_uri(scheme: &str, path: &str) -> String {
    format!("{}://{}", scheme, path)
}

/// Description of the read operations this service offers.
pub fn service_info() -> Value {
    json!({
        "title": "Welcome",
        "routes": ["/", "/blog/:uri/:scheme/:cacheMode", "/discover/:uri/:scheme"],
    })
}

pub struct ExtractionService<F, S> {
    fetcher: F,
    cache: CacheAside<S>,
    ttl_minutes: u64,
}

impl<F: Fetcher, S: KeyValueStore> ExtractionService<F, S> {
    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            cache: CacheAside::new(store),
            ttl_minutes: PAGE_TTL_MINUTES,
        }
    }

    pub fn with_ttl_minutes(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    pub fn cache(&self) -> &CacheAside<S> {
        &self.cache
    }

    pub fn into_store(self) -> S {
        self.cache.into_store()
    }

    /// Fetches `uri` and extracts its title, articles and links, bypassing
    /// the cache entirely.
    pub async fn read_live_page(&self, uri: &str) -> Page {
        let fetched = self.fetcher.fetch(uri).await;
        let page = build_page(&fetched);
        info!(
            "Read {} (exists: {}, articles: {}, links: {})",
            uri,
            page.exists,
            page.articles.len(),
            page.links.len()
        );
        page
    }

    /// Reads the page at `scheme://path` through the cache.
    ///
    /// Returns the page and whether it was served from the store.
    pub async fn read_blog_page(&self, path: &str, scheme: &str, mode: CacheMode) -> (Page, bool) {
        let uri = page_uri(scheme, path);
        let uri = uri.as_str();
        self.cache
            .get_or_compute(&cache_key(path), self.ttl_minutes, mode.use_cache(), move || {
                self.read_live_page(uri)
            })
            .await
    }

    /// Fetches `scheme://path` and computes its statistics. Never cached.
    pub async fn discover_page(&self, path: &str, scheme: &str) -> PageStats {
        let uri = page_uri(scheme, path);
        let fetched = self.fetcher.fetch(&uri).await;
        let stats = build_stats(&fetched);
        info!("Discovered {} ({} counts)", uri, stats.counts.len());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_scheme() {
        assert_eq!(cache_key("example.com/blog"), "page:example.com/blog");
        assert_eq!(page_uri("https", "example.com/blog"), "https://example.com/blog");
    }

    #[test]
    fn test_cache_mode_parsing() {
        assert_eq!(CacheMode::from_str("refresh"), CacheMode::Refresh);
        assert_eq!(CacheMode::from_str("REFRESH"), CacheMode::Refresh);
        assert_eq!(CacheMode::from_str("cached"), CacheMode::Cached);
        assert_eq!(CacheMode::from_str(""), CacheMode::Cached);
        assert!(CacheMode::Cached.use_cache());
        assert!(!CacheMode::Refresh.use_cache());
    }

    #[test]
    fn test_service_info_lists_routes() {
        let info = service_info();
        assert_eq!(info["title"], "Welcome");
        assert_eq!(info["routes"].as_array().unwrap().len(), 3);
    }
}
