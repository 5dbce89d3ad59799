use serde::{Deserialize, Serialize};

/// A hyperlink found on a page or inside an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub title: String,
    pub uri: String,
}

impl LinkItem {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub uri: String,
    pub content: String,
    pub links: Vec<LinkItem>,
}

/// The extracted view of one fetched document.
///
/// A page that could not be fetched keeps `exists = false` with an empty
/// title and no articles or links. `cached` is only ever switched on by
/// [`Page::mark_cached`] when the value comes back out of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub uri: String,
    pub exists: bool,
    pub cached: bool,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<LinkItem>,
}

impl Page {
    pub fn new(
        uri: String,
        title: String,
        articles: Vec<Article>,
        links: Vec<LinkItem>,
    ) -> Self {
        Self {
            uri,
            exists: true,
            cached: false,
            title,
            articles,
            links,
        }
    }

    pub fn missing(uri: String) -> Self {
        Self {
            uri,
            exists: false,
            cached: false,
            title: String::new(),
            articles: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn mark_cached(&mut self) {
        self.cached = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountItem {
    pub key: String,
    pub value: usize,
}

/// Ordered count metrics for one document.
///
/// `words` is reserved and stays empty; it is serialized so consumers of the
/// JSON shape keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub uri: String,
    pub exists: bool,
    pub counts: Vec<CountItem>,
    pub words: Vec<String>,
}

impl PageStats {
    pub fn new(uri: String, exists: bool) -> Self {
        Self {
            uri,
            exists,
            counts: Vec::new(),
            words: Vec::new(),
        }
    }

    pub fn add_count(&mut self, key: impl Into<String>, value: usize) {
        self.counts.push(CountItem {
            key: key.into(),
            value,
        });
    }

    /// First count recorded under `key`, if any.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value)
    }
}

// Payloads written by older producers encode empty collections as null.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
