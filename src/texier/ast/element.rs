//! Elements and nodes
//!
//! Content normalization: whenever children are assigned, adjacent text runs are
//! merged, and a child list made only of text collapses into a single
//! [`Content::Text`]. Consumers can rely on never seeing a list of bare strings.

use super::modifier::Modifier;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// No content at all. Only void tags render this way.
    #[default]
    Absent,
    Text(String),
    Nodes(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    /// Attribute present without a value, e.g. `<input disabled>`.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub content: Content,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub style: BTreeMap<String, String>,
    /// Unique, in insertion order.
    pub classes: Vec<String>,
    pub id: Option<String>,
    /// Raw heading level, set by the heading grammar and resolved when the
    /// document is finished.
    pub outline_level: Option<u8>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            content: Content::Absent,
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            classes: Vec::new(),
            id: None,
            outline_level: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.set_children(children);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Text(value.into()));
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Replace the content with `children`, normalized.
    pub fn set_children(&mut self, children: Vec<Node>) {
        let mut merged: Vec<Node> = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Node::Text(text) if text.is_empty() => {}
                Node::Text(text) => match merged.last_mut() {
                    Some(Node::Text(previous)) => previous.push_str(&text),
                    _ => merged.push(Node::Text(text)),
                },
                child => merged.push(child),
            }
        }

        self.content = if merged.iter().all(|node| matches!(node, Node::Text(_))) {
            let mut text = String::new();
            for node in merged {
                if let Node::Text(part) = node {
                    text.push_str(&part);
                }
            }
            Content::Text(text)
        } else {
            Content::Nodes(merged)
        };
    }

    pub fn append(&mut self, node: Node) {
        let mut children = match std::mem::take(&mut self.content) {
            Content::Absent => Vec::new(),
            Content::Text(text) => vec![Node::Text(text)],
            Content::Nodes(nodes) => nodes,
        };
        children.push(node);
        self.set_children(children);
    }

    /// True when the content holds at least one element.
    pub fn has_children(&self) -> bool {
        self.children()
            .iter()
            .any(|node| matches!(node, Node::Element(_)))
    }

    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Nodes(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        let nodes = match &mut self.content {
            Content::Nodes(nodes) => Some(nodes),
            _ => None,
        };
        nodes.into_iter().flatten().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Merge a modifier into this element. `None` leaves it untouched.
    pub fn modify(mut self, modifier: Option<&Modifier>) -> Self {
        self.apply(modifier);
        self
    }

    pub fn apply(&mut self, modifier: Option<&Modifier>) {
        let Some(modifier) = modifier else {
            return;
        };
        for class in &modifier.classes {
            self.add_class(class.clone());
        }
        if let Some(id) = &modifier.id {
            self.id = Some(id.clone());
        }
        for (name, value) in &modifier.style {
            self.style.insert(name.clone(), value.clone());
        }
    }

    /// Concatenated text of this element and its descendants. Comments are skipped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.content {
            Content::Absent => {}
            Content::Text(text) => out.push_str(text),
            Content::Nodes(nodes) => {
                for node in nodes {
                    match node {
                        Node::Text(text) => out.push_str(text),
                        Node::Element(element) => element.collect_text(out),
                        Node::Comment(_) => {}
                    }
                }
            }
        }
    }
}
