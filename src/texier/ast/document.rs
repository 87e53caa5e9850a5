//! Processed document: the root element plus the outline gathered from headings.

use super::element::{Element, Node};
use crate::texier::formats::html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Container for the top-level blocks. Its own tag is never rendered.
    pub root: Element,
    pub toc: Vec<TocEntry>,
    /// Text of the first heading, if any.
    pub title: Option<String>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Element::new("body").with_children(children),
            toc: Vec::new(),
            title: None,
        }
    }

    pub fn to_html(&self) -> String {
        html::render_document(self)
    }
}
