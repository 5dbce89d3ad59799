use skimmer_scanner::{FetchOptions, MIN_TIMEOUT_SECS};
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "~/.config/skimmer/cache.db";

/// Time-to-live of cached pages: 24 hours.
pub const PAGE_TTL_MINUTES: u64 = 1440;

/// Runtime settings for the extraction service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub store_path: PathBuf,
    pub ttl_minutes: u64,
    pub fetch: FetchOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_path: expand_path(DEFAULT_STORE_PATH),
            ttl_minutes: PAGE_TTL_MINUTES,
            fetch: FetchOptions::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_store_path(mut self, path: &str) -> Self {
        self.store_path = expand_path(path);
        self
    }

    /// Sets the request timeout, never below one second.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.fetch.timeout_secs = timeout_secs.max(MIN_TIMEOUT_SECS);
        self
    }

    pub fn with_ttl_minutes(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
