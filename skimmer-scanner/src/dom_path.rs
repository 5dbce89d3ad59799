// Breadcrumb identifiers for elements, built from tag, id and classes

use crate::text::element_word_count;
use scraper::ElementRef;

/// Descriptor of a single element used to build its breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassesIdSet {
    pub parent_path: String,
    pub tag_name: String,
    pub id: String,
    pub classes: Vec<String>,
    pub word_count: usize,
}

impl ClassesIdSet {
    /// `tag#id.class1.class2` with the id and class parts omitted when empty.
    pub fn fragment(&self) -> String {
        fragment(&self.tag_name, &self.id, &self.classes)
    }

    pub fn to_path(&self) -> String {
        join_path(&self.parent_path, &self.fragment())
    }
}

/// Builds the descriptor for `element`, including its breadcrumb parent path
/// and word count.
pub fn build_classes_id_set(element: ElementRef<'_>) -> ClassesIdSet {
    let (tag_name, id, classes) = describe(element);
    ClassesIdSet {
        parent_path: parent_path_of(element),
        tag_name,
        id,
        classes,
        word_count: element_word_count(element),
    }
}

/// Breadcrumb path of `element`, e.g. `div#main section.post.featured`.
pub fn build_path(element: ElementRef<'_>) -> String {
    let (tag_name, id, classes) = describe(element);
    join_path(&parent_path_of(element), &fragment(&tag_name, &id, &classes))
}

struct ChainEntry {
    tag_name: String,
    fragment: String,
    path: String,
}

/// Resolves the parent path of `element` by walking its ancestor chain from
/// the root down, so deep trees never recurse.
fn parent_path_of(element: ElementRef<'_>) -> String {
    // Ancestors nearest-first, then flipped so every entry can reuse the
    // already-computed paths of its own parent and grandparent.
    let mut ancestors: Vec<ElementRef<'_>> = Vec::new();
    let mut current = element;
    while let Some(parent) = current.parent().and_then(ElementRef::wrap) {
        ancestors.push(parent);
        current = parent;
    }
    ancestors.reverse();

    let mut chain: Vec<ChainEntry> = Vec::with_capacity(ancestors.len());
    for ancestor in ancestors {
        let (tag_name, id, classes) = describe(ancestor);
        let parent_path = resolve_parent_path(&chain);
        let fragment = fragment(&tag_name, &id, &classes);
        let path = join_path(&parent_path, &fragment);
        chain.push(ChainEntry {
            tag_name,
            fragment,
            path,
        });
    }

    resolve_parent_path(&chain)
}

/// Applies the parent selection rule to the last two entries of `chain`
/// (the parent and grandparent of the element being described).
///
/// The parent's path is used unless the parent itself carries neither a
/// class nor an id, in which case the grandparent's path replaces it. Only
/// one generation is ever skipped. `html` and `body` never contribute.
fn resolve_parent_path(chain: &[ChainEntry]) -> String {
    let mut parent_path = String::new();
    let Some((parent, rest)) = chain.split_last() else {
        return parent_path;
    };

    if !is_root_wrapper(&parent.tag_name) {
        parent_path = parent.path.clone();
    }
    if !parent.fragment.contains(['.', '#'])
        && let Some(grandparent) = rest.last()
        && !is_root_wrapper(&grandparent.tag_name)
    {
        parent_path = grandparent.path.clone();
    }

    parent_path
}

fn describe(element: ElementRef<'_>) -> (String, String, Vec<String>) {
    let value = element.value();
    let tag_name = value.name().to_string();
    let id = value.attr("id").unwrap_or_default().to_string();
    let classes = value
        .attr("class")
        .map(|class| class.split(' ').map(str::to_string).collect())
        .unwrap_or_default();
    (tag_name, id, classes)
}

fn fragment(tag_name: &str, id: &str, classes: &[String]) -> String {
    let mut fragment = String::from(tag_name);
    if !id.is_empty() {
        fragment.push('#');
        fragment.push_str(id);
    }
    if !classes.is_empty() {
        fragment.push('.');
        fragment.push_str(&classes.join("."));
    }
    fragment
}

fn join_path(parent_path: &str, fragment: &str) -> String {
    format!("{} {}", parent_path, fragment).trim_matches(' ').to_string()
}

fn is_root_wrapper(tag_name: &str) -> bool {
    tag_name == "html" || tag_name == "body"
}
