// End-to-end tests for the extraction service against a mock HTTP server

use skimmer_core::service::{CacheMode, ExtractionService, cache_key};
use skimmer_core::store::{KeyValueStore, MemoryStore};
use skimmer_scanner::{HttpFetcher, LinkItem, Page};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const BLOG_HTML: &str = r#"<html><head><title>Example Blog</title></head><body>
<nav><a href="/">Home</a></nav>
<article><h2><a href="/p1">T</a></h2><p>hello world</p></article>
<article><p>Teaser without a heading</p></article>
</body></html>"#;

fn host_path(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri().trim_start_matches("http://"), route)
}

async fn mount_html(server: &MockServer, route: &str, body: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn service(store: Arc<MemoryStore>) -> ExtractionService<HttpFetcher, Arc<MemoryStore>> {
    ExtractionService::new(HttpFetcher::new().unwrap(), store)
}

// ============================================================================
// Blog Read Tests
// ============================================================================

#[tokio::test]
async fn test_blog_read_extracts_articles() {
    let server = MockServer::start().await;
    mount_html(&server, "/blog", BLOG_HTML, 1).await;

    let service = service(Arc::new(MemoryStore::new()));
    let (page, cached) = service
        .read_blog_page(&host_path(&server, "/blog"), "http", CacheMode::Cached)
        .await;

    assert!(!cached);
    assert!(page.exists);
    assert!(!page.cached);
    assert_eq!(page.uri, format!("{}/blog", server.uri()));
    assert_eq!(page.title, "Example Blog");
    assert_eq!(page.articles.len(), 1);

    let article = &page.articles[0];
    assert_eq!(article.title, "T");
    assert_eq!(article.uri, "/p1");
    assert!(article.content.ends_with("<p>hello world</p>"));
    assert_eq!(article.links, vec![LinkItem::new("T", "/p1")]);

    assert_eq!(
        page.links,
        vec![LinkItem::new("Home", "/"), LinkItem::new("T", "/p1")]
    );
}

#[tokio::test]
async fn test_second_read_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_html(&server, "/blog", BLOG_HTML, 1).await;

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let blog = host_path(&server, "/blog");

    let (fresh, fresh_cached) = service.read_blog_page(&blog, "http", CacheMode::Cached).await;
    let (hit, hit_cached) = service.read_blog_page(&blog, "http", CacheMode::Cached).await;

    assert!(!fresh_cached);
    assert!(hit_cached);
    assert!(hit.cached);
    assert_eq!(hit.articles, fresh.articles);
    assert_eq!(hit.links, fresh.links);

    // The stored copy never carries the cached flag
    let stored: Page = serde_json::from_slice(&store.get(&cache_key(&blog)).unwrap().unwrap()).unwrap();
    assert!(!stored.cached);
}

#[tokio::test]
async fn test_refresh_always_fetches() {
    let server = MockServer::start().await;
    mount_html(&server, "/blog", BLOG_HTML, 2).await;

    let service = service(Arc::new(MemoryStore::new()));
    let blog = host_path(&server, "/blog");

    let (_, first) = service.read_blog_page(&blog, "http", CacheMode::Refresh).await;
    let (page, second) = service.read_blog_page(&blog, "http", CacheMode::Refresh).await;

    assert!(!first);
    assert!(!second);
    assert!(!page.cached);
}

#[tokio::test]
async fn test_scheme_variants_share_cache_entry() {
    let server = MockServer::start().await;
    mount_html(&server, "/blog", BLOG_HTML, 1).await;

    let service = service(Arc::new(MemoryStore::new()));
    let blog = host_path(&server, "/blog");

    let _ = service.read_blog_page(&blog, "http", CacheMode::Cached).await;
    let (page, cached) = service.read_blog_page(&blog, "https", CacheMode::Cached).await;

    assert!(cached);
    assert!(page.uri.starts_with("http://"));
}

#[tokio::test]
async fn test_missing_page_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = service(Arc::new(MemoryStore::new()));
    let (page, cached) = service
        .read_blog_page(&host_path(&server, "/gone"), "http", CacheMode::Cached)
        .await;

    assert!(!cached);
    assert!(!page.exists);
    assert_eq!(page.title, "");
    assert!(page.articles.is_empty());
    assert!(page.links.is_empty());
}

#[tokio::test]
async fn test_stored_entry_is_indented_json() {
    let server = MockServer::start().await;
    mount_html(&server, "/blog", BLOG_HTML, 1).await;

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let blog = host_path(&server, "/blog");
    let _ = service.read_blog_page(&blog, "http", CacheMode::Cached).await;

    let bytes = store.get(&format!("page:{}", blog)).unwrap().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("{\n  \"uri\": "));
    for field in ["\"exists\"", "\"cached\"", "\"title\"", "\"articles\"", "\"links\""] {
        assert!(text.contains(field), "missing {}", field);
    }
}

// ============================================================================
// Discover Tests
// ============================================================================

#[tokio::test]
async fn test_discover_reports_blocks() {
    let words = |prefix: &str, count: usize| {
        (0..count)
            .map(|i| format!("{}{}", prefix, i))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let html = format!(
        r#"<html><body><div id="x"><div class="foo">{}</div> <div class="bar">{}</div></div></body></html>"#,
        words("w", 17),
        words("v", 16)
    );

    let server = MockServer::start().await;
    mount_html(&server, "/stats", &html, 1).await;

    let store = Arc::new(MemoryStore::new());
    let service = service(store.clone());
    let stats = service
        .discover_page(&host_path(&server, "/stats"), "http")
        .await;

    assert!(stats.exists);
    assert!(stats.words.is_empty());
    let foo = stats
        .counts
        .iter()
        .find(|item| item.key.contains("div#x") && item.key.contains(".foo"))
        .expect("block entry for .foo");
    assert_eq!(foo.value, 17);
    assert!(!stats.counts.iter().any(|item| item.key.contains(".bar")));

    // Statistics are never cached
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_discover_missing_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = service(Arc::new(MemoryStore::new()));
    let stats = service
        .discover_page(&host_path(&server, "/gone"), "http")
        .await;

    assert!(!stats.exists);
    assert!(stats.counts.is_empty());
}
