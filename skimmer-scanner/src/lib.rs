pub mod articles;
pub mod dom_path;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod result;
pub mod stats;
pub mod text;

pub use articles::{ArticleBatch, MAX_ARTICLES, extract_articles};
pub use dom_path::{ClassesIdSet, build_classes_id_set, build_path};
pub use error::ScanError;
pub use fetcher::{FetchOptions, FetchedPage, Fetcher, HttpFetcher, MIN_TIMEOUT_SECS};
pub use page::{build_page, build_stats};
pub use result::{Article, CountItem, LinkItem, Page, PageStats};
pub use stats::analyze_page;
pub use text::count_words;
