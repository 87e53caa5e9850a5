//! HTML tag classification
//!
//! The table covers the tags the passthrough grammar knows how to match. A tag
//! missing from it is not HTML as far as the rest of the crate is concerned.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Has an opening and a closing tag around content.
    Pair,
    /// Void element: attributes only.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Block,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagKind {
    pub pairing: Pairing,
    pub category: Category,
}

#[derive(Debug)]
pub struct Dtd {
    tags: BTreeMap<&'static str, TagKind>,
}

const BLOCK_PAIRS: &[&str] = &[
    "address", "blockquote", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "iframe",
    "li", "ol", "p", "pre", "script", "style", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    "ul",
];

const BLOCK_EMPTY: &[&str] = &["hr"];

const INLINE_PAIRS: &[&str] = &[
    "a", "abbr", "acronym", "b", "big", "cite", "code", "del", "dfn", "em", "i", "ins", "kbd", "q",
    "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "tt", "u", "var",
];

const INLINE_EMPTY: &[&str] = &["br", "img"];

static HTML: Lazy<Dtd> = Lazy::new(|| {
    let mut tags = BTreeMap::new();
    let groups = [
        (BLOCK_PAIRS, Pairing::Pair, Category::Block),
        (BLOCK_EMPTY, Pairing::Empty, Category::Block),
        (INLINE_PAIRS, Pairing::Pair, Category::Inline),
        (INLINE_EMPTY, Pairing::Empty, Category::Inline),
    ];
    for (names, pairing, category) in groups {
        for name in names.iter().copied() {
            tags.insert(name, TagKind { pairing, category });
        }
    }
    Dtd { tags }
});

impl Dtd {
    pub fn html() -> &'static Dtd {
        &HTML
    }

    pub fn get(&self, tag: &str) -> Option<TagKind> {
        self.tags.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// True for void tags. Unknown tags count as pairable.
    pub fn is_empty_tag(&self, tag: &str) -> bool {
        matches!(self.get(tag), Some(TagKind { pairing: Pairing::Empty, .. }))
    }

    /// Known tag names in alphabetical order.
    pub fn tags(&self) -> impl Iterator<Item = (&'static str, TagKind)> + '_ {
        self.tags.iter().map(|(name, kind)| (*name, *kind))
    }
}
