pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod service;
pub mod store;

pub use cache::{CacheAside, Cacheable};
pub use config::{PAGE_TTL_MINUTES, ServiceConfig};
pub use data::SqliteStore;
pub use error::StoreError;
pub use service::{CacheMode, ExtractionService, cache_key, page_uri, service_info};
pub use store::{KeyValueStore, MemoryStore};

pub fn print_banner() {
    eprintln!(
        r#"
      _    _
  ___| | _(_)_ __ ___  _ __ ___   ___ _ __
 / __| |/ / | '_ ` _ \| '_ ` _ \ / _ \ '__|
 \__ \   <| | | | | | | | | | | |  __/ |
 |___/_|\_\_|_| |_| |_|_| |_| |_|\___|_|   v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
