// Word counting and link collection helpers shared by the extractors

use crate::result::LinkItem;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\f\r ]{2,}").expect("whitespace pattern is valid"));

/// Collapses runs of two or more ASCII whitespace characters into a single
/// space and trims surrounding spaces. Non-breaking and other Unicode spaces
/// are ordinary characters here, so `"a \u{a0} b"` stays three words.
pub fn collapse_spaces(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, " ")
        .trim_matches(' ')
        .to_string()
}

/// Splits text into words on single spaces after collapsing whitespace.
///
/// Empty or whitespace-only input still yields one empty word, so
/// `count_words("")` is 1. Downstream thresholds were tuned against this
/// behaviour and it is kept as is.
pub fn split_words(text: &str) -> Vec<String> {
    collapse_spaces(text)
        .split(' ')
        .map(str::to_string)
        .collect()
}

pub fn count_words(text: &str) -> usize {
    split_words(text).len()
}

/// Flattened text of an element and all of its descendants.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn element_word_count(element: ElementRef<'_>) -> usize {
    count_words(&element_text(element))
}

pub fn contains_uri(links: &[LinkItem], uri: &str) -> bool {
    links.iter().any(|link| link.uri == uri)
}

/// Appends `link` unless a link with the same uri is already present.
/// Returns whether the link was added.
pub fn push_unique(links: &mut Vec<LinkItem>, link: LinkItem) -> bool {
    if contains_uri(links, &link.uri) {
        return false;
    }
    links.push(link);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_count_words_empty_is_one() {
        assert_eq!(count_words(""), 1);
        assert_eq!(count_words("   "), 1);
    }

    #[test]
    fn test_count_words_collapses_runs() {
        assert_eq!(count_words("a   b"), 2);
        assert_eq!(count_words("  a  b  c  "), 3);
        assert_eq!(count_words("one\n\n\ttwo three"), 3);
    }

    #[test]
    fn test_count_words_keeps_unicode_spaces() {
        assert_eq!(count_words("a \u{a0} b"), 3);
        assert_eq!(collapse_spaces("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_split_words_order() {
        assert_eq!(split_words(" hello   big world "), vec!["hello", "big", "world"]);
    }

    #[test]
    fn test_element_word_count_spans_descendants() {
        let html = Html::parse_fragment("<div>alpha <b>beta</b>   <i>gamma delta</i></div>");
        let selector = Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();
        assert_eq!(element_word_count(div), 4);
    }

    #[test]
    fn test_push_unique_first_wins() {
        let mut links = Vec::new();
        assert!(push_unique(&mut links, LinkItem::new("First", "/a")));
        assert!(!push_unique(&mut links, LinkItem::new("Second", "/a")));
        assert!(push_unique(&mut links, LinkItem::new("Other", "/b")));
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "First");
    }
}
