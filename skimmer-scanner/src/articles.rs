// Article extraction from <article> candidates

use crate::result::{Article, LinkItem};
use crate::text::push_unique;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Maximum number of `<article>` candidates considered per document.
pub const MAX_ARTICLES: usize = 100;

const CANDIDATE_SELECTOR_STR: &str = "article";
const NOISE_SELECTOR_STR: &str = "img,svg,embed,iframe,object,style,script";
const HEADING_SELECTOR_STR: &str = "h1,h2,h3";
const ANCHOR_SELECTOR_STR: &str = "a";

static CANDIDATE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(CANDIDATE_SELECTOR_STR));
static NOISE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector(NOISE_SELECTOR_STR));
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(HEADING_SELECTOR_STR));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector(ANCHOR_SELECTOR_STR));

static COMMENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--[^>]*?-->").expect("comment pattern is valid"));

pub(crate) fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("built-in selector is valid")
}

/// Articles found in a document, plus how many candidates were dropped
/// because the document had more than [`MAX_ARTICLES`] of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleBatch {
    pub articles: Vec<Article>,
    pub truncated: usize,
}

/// Extracts articles from every `<article>` element of `document`.
///
/// The document is not modified; noise elements are removed from a working
/// copy. Candidates without a linked h1/h2/h3 heading produce nothing.
pub fn extract_articles(document: &Html) -> ArticleBatch {
    let mut working = document.clone();

    let candidate_ids: Vec<_> = working
        .select(&CANDIDATE_SELECTOR)
        .map(|candidate| candidate.id())
        .collect();

    let noise_ids: Vec<_> = candidate_ids
        .iter()
        .filter_map(|id| working.tree.get(*id).and_then(ElementRef::wrap))
        .flat_map(|candidate| candidate.select(&NOISE_SELECTOR).map(|noise| noise.id()))
        .collect();
    for id in noise_ids {
        if let Some(mut node) = working.tree.get_mut(id) {
            node.detach();
        }
    }

    let truncated = candidate_ids.len().saturating_sub(MAX_ARTICLES);
    if truncated > 0 {
        warn!(
            "Document has {} article candidates, dropping {} beyond the limit of {}",
            candidate_ids.len(),
            truncated,
            MAX_ARTICLES
        );
    }

    let mut articles = Vec::new();
    for (index, id) in candidate_ids.into_iter().take(MAX_ARTICLES).enumerate() {
        let Some(candidate) = working.tree.get(id).and_then(ElementRef::wrap) else {
            debug!("Article candidate {} is no longer in the tree, skipping", index);
            continue;
        };
        match build_article(candidate) {
            Some(article) => articles.push(article),
            None => debug!("Article candidate {} has no linked heading, skipping", index),
        }
    }

    ArticleBatch {
        articles,
        truncated,
    }
}

fn build_article(candidate: ElementRef<'_>) -> Option<Article> {
    let content = sanitize_content(&candidate.inner_html());

    let heading = candidate.select(&HEADING_SELECTOR).next()?;
    let title: String = heading.text().collect();
    let permalink = heading.select(&ANCHOR_SELECTOR).next()?;
    let uri = permalink.value().attr("href").unwrap_or_default().to_string();

    Some(Article {
        title,
        uri,
        content,
        links: collect_links(candidate),
    })
}

/// Strips comment blocks and surrounding whitespace from serialized markup.
pub fn sanitize_content(markup: &str) -> String {
    COMMENT_BLOCK
        .replace_all(markup, "")
        .trim_matches(['\n', '\t', ' '])
        .to_string()
}

/// Every anchor with an href inside `scope`, deduplicated by href.
pub fn collect_links(scope: ElementRef<'_>) -> Vec<LinkItem> {
    let mut links = Vec::new();
    for anchor in scope.select(&ANCHOR_SELECTOR) {
        if let Some(href) = anchor.value().attr("href") {
            let title: String = anchor.text().collect();
            push_unique(&mut links, LinkItem::new(title, href));
        }
    }
    links
}
