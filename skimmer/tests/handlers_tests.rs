use skimmer::handlers::*;
use skimmer_core::KeyValueStore;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com/blog").map(|u| u.to_string());
    assert_eq!(result, Some("https://example.com/blog".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com/blog").map(|u| u.to_string());
    assert_eq!(result, Some("http://example.com/blog".to_string()));
}

#[test]
fn test_parse_url_line_host_and_port() {
    let result = parse_url_line("localhost:8080/posts").map(|u| u.to_string());
    assert_eq!(result, Some("http://localhost:8080/posts".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    assert_eq!(parse_url_line("not a valid url!!!"), None);
    assert_eq!(parse_url_line("   "), None);
}

#[test]
fn test_split_target_https() {
    let (scheme, path) = split_target("https://example.com/blog").unwrap();
    assert_eq!(scheme, "https");
    assert_eq!(path, "example.com/blog");
}

#[test]
fn test_split_target_defaults_to_http() {
    let (scheme, path) = split_target("example.com/blog?page=2").unwrap();
    assert_eq!(scheme, "http");
    assert_eq!(path, "example.com/blog?page=2");
}

#[test]
fn test_split_target_drops_fragment() {
    let (_, path) = split_target("https://example.com/post#comments").unwrap();
    assert_eq!(path, "example.com/post");
}

#[test]
fn test_split_target_rejects_other_schemes() {
    let err = split_target("ftp://example.com/file").unwrap_err();
    assert!(err.contains("ftp"));
}

#[test]
fn test_cache_backend_without_path_is_memory() {
    let backend = CacheBackend::open(None);
    assert!(matches!(backend, CacheBackend::Memory(_)));

    backend.set("page:example.com", b"{}", 5).unwrap();
    assert_eq!(backend.get("page:example.com").unwrap(), Some(b"{}".to_vec()));
    backend.close();
}

#[test]
fn test_cache_backend_opens_sqlite() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("nested").join("cache.db");

    let backend = CacheBackend::open(Some(&path));
    assert!(matches!(backend, CacheBackend::Sqlite(_)));
    backend.set("page:a", b"one", 5).unwrap();
    backend.close();

    let reopened = CacheBackend::open(Some(&path));
    assert_eq!(reopened.get("page:a").unwrap(), Some(b"one".to_vec()));
    reopened.close();
}

#[test]
fn test_cache_backend_falls_back_to_memory() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    // Parent directory cannot be created under a regular file
    let backend = CacheBackend::open(Some(&blocker.join("cache.db")));
    assert!(matches!(backend, CacheBackend::Memory(_)));
}
