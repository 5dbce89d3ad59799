// Assembles a Page from fetched markup

use crate::articles::{extract_articles, parse_selector};
use crate::fetcher::FetchedPage;
use crate::result::{LinkItem, Page, PageStats};
use crate::stats::analyze_page;
use crate::text::push_unique;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("title"));
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("a[href]"));

/// Builds the page view of a fetch result. Missing pages stay empty.
pub fn build_page(fetched: &FetchedPage) -> Page {
    if !fetched.exists {
        return Page::missing(fetched.uri.clone());
    }

    let document = Html::parse_document(&fetched.body);
    let batch = extract_articles(&document);
    debug!(
        "Extracted {} articles from {} ({} dropped)",
        batch.articles.len(),
        fetched.uri,
        batch.truncated
    );

    Page::new(
        fetched.uri.clone(),
        document_title(&document),
        batch.articles,
        page_links(&fetched.uri, &document),
    )
}

/// Builds the statistics view of a fetch result.
pub fn build_stats(fetched: &FetchedPage) -> PageStats {
    if !fetched.exists {
        return PageStats::new(fetched.uri.clone(), false);
    }
    let document = Html::parse_document(&fetched.body);
    analyze_page(&fetched.uri, &document, true)
}

pub fn document_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| title.text().collect())
        .unwrap_or_default()
}

/// Page-level links keyed by the path of each resolved href.
///
/// Hrefs that do not resolve to a hierarchical URL (`mailto:`,
/// `javascript:`) or whose path is empty are skipped. The first anchor for a
/// path wins.
pub fn page_links(base: &str, document: &Html) -> Vec<LinkItem> {
    let base_url = Url::parse(base).ok();
    let mut links = Vec::new();

    for anchor in document.select(&LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(path) = resolve_path(base_url.as_ref(), href) else {
            continue;
        };
        let title: String = anchor.text().collect();
        push_unique(&mut links, LinkItem::new(title, path));
    }

    links
}

fn resolve_path(base: Option<&Url>, href: &str) -> Option<String> {
    let resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    if resolved.cannot_be_a_base() || resolved.path().is_empty() {
        return None;
    }
    Some(resolved.path().to_string())
}
