// Page statistics: tag counts, word counts and per-block breadcrumbs

use crate::articles::parse_selector;
use crate::dom_path::build_classes_id_set;
use crate::result::PageStats;
use crate::text::element_word_count;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// Blocks must have strictly more words than this to be reported.
pub const BLOCK_WORD_THRESHOLD: usize = 16;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("a[href]"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("a"));
static ARTICLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("article"));
static SECTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("section"));
static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("table"));
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("body"));
static NOISE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector("img,figure,object,iframe,svg,audio,video,script,style")
});
static BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("div, article, section, aside"));

/// Computes the count metrics for a fetched document.
///
/// A document that does not exist yields a `PageStats` with no counts.
pub fn analyze_page(uri: &str, document: &Html, exists: bool) -> PageStats {
    let mut stats = PageStats::new(uri.to_string(), exists);
    if !exists {
        return stats;
    }

    stats.add_count("links", document.select(&LINK_SELECTOR).count());
    stats.add_count("articleTags", document.select(&ARTICLE_SELECTOR).count());
    stats.add_count("sectionTags", document.select(&SECTION_SELECTOR).count());
    stats.add_count("tableTags", document.select(&TABLE_SELECTOR).count());

    let mut working = document.clone();
    if body(&working).is_none() {
        debug!("No body element in {}", uri);
        return stats;
    }

    remove_from_body(&mut working, &NOISE_SELECTOR);
    let Some(stripped) = body(&working) else {
        return stats;
    };
    stats.add_count("words", element_word_count(stripped));
    stats.add_count("numInnerLinks", stripped.select(&ANCHOR_SELECTOR).count());

    remove_from_body(&mut working, &ANCHOR_SELECTOR);
    let Some(stripped) = body(&working) else {
        return stats;
    };
    stats.add_count("wordsNotInLinks", element_word_count(stripped));

    for block in stripped.select(&BLOCK_SELECTOR) {
        let set = build_classes_id_set(block);
        if set.word_count > BLOCK_WORD_THRESHOLD {
            stats.add_count(set.to_path(), set.word_count);
        }
    }

    debug!("Collected {} counts for {}", stats.counts.len(), uri);
    stats
}

fn body(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&BODY_SELECTOR).next()
}

/// Detaches every element inside the body matching `selector`.
fn remove_from_body(document: &mut Html, selector: &Selector) {
    let ids: Vec<_> = match body(document) {
        Some(body) => body.select(selector).map(|matched| matched.id()).collect(),
        None => return,
    };
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
