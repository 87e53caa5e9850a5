//! HTML rendering
//!
//! Rendering is total and never validates: the tree was validated while it was
//! built. All text is escaped; attribute values additionally escape `"`.
//! Attributes are written in name order, so output is byte-stable.

use crate::texier::ast::{AttributeValue, Content, Document, Element, Node};
use crate::texier::validation::Dtd;
use std::collections::BTreeMap;

/// The document's blocks, without the root element's own tag.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    render_content(&doc.root.content, &mut out);
    out
}

pub fn render(element: &Element) -> String {
    let mut out = String::new();
    render_element(element, &mut out);
    out
}

fn render_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in attributes(element) {
        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            escape_attribute(&value, out);
            out.push('"');
        }
    }

    if matches!(element.content, Content::Absent) && Dtd::html().is_empty_tag(&element.tag) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    render_content(&element.content, out);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn render_content(content: &Content, out: &mut String) {
    match content {
        Content::Absent => {}
        Content::Text(text) => escape_text(text, out),
        Content::Nodes(nodes) => {
            for node in nodes {
                render_node(node, out);
            }
        }
    }
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_text(text, out),
        Node::Element(element) => render_element(element, out),
        Node::Comment(text) => render_comment(text, out),
    }
}

/// The body may not close the comment early: angle brackets are escaped and no
/// two dashes stay adjacent, including across the closing `-->`.
fn render_comment(text: &str, out: &mut String) {
    out.push_str("<!--");
    let mut previous = None;
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '-' if previous == Some('-') => out.push_str(" -"),
            _ => out.push(c),
        }
        previous = Some(c);
    }
    if previous == Some('-') {
        out.push(' ');
    }
    out.push_str("-->");
}

fn attributes(element: &Element) -> BTreeMap<&str, Option<String>> {
    let mut all: BTreeMap<&str, Option<String>> = element
        .attributes
        .iter()
        .map(|(name, value)| {
            let value = match value {
                AttributeValue::Text(text) => Some(text.clone()),
                AttributeValue::Flag => None,
            };
            (name.as_str(), value)
        })
        .collect();

    if !element.classes.is_empty() {
        all.insert("class", Some(element.classes.join(" ")));
    }
    if let Some(id) = &element.id {
        all.insert("id", Some(id.clone()));
    }
    if !element.style.is_empty() {
        let style = element
            .style
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join(";");
        all.insert("style", Some(style));
    }
    all
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            _ => escape_text(ch.encode_utf8(&mut [0; 4]), out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let element = Element::new("p").with_text("a < b & c > d");
        assert_eq!(render(&element), "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn test_attributes_are_sorted_and_escaped() {
        let mut element = Element::new("a")
            .with_attribute("title", "say \"hi\" & go")
            .with_attribute("href", "http://x.org/?a=1&b=2")
            .with_class("ext")
            .with_text("x");
        element.id = Some("top".to_string());
        element.style.insert("color".to_string(), "red".to_string());
        element.style.insert("border".to_string(), "0".to_string());

        assert_eq!(
            render(&element),
            "<a class=\"ext\" href=\"http://x.org/?a=1&amp;b=2\" id=\"top\" \
             style=\"border:0;color:red\" title=\"say &quot;hi&quot; &amp; go\">x</a>"
        );
    }

    #[test]
    fn test_void_and_empty_elements() {
        assert_eq!(render(&Element::new("br")), "<br />");
        assert_eq!(
            render(&Element::new("img").with_attribute("src", "a.png")),
            "<img src=\"a.png\" />"
        );
        assert_eq!(render(&Element::new("p")), "<p></p>");
        assert_eq!(render(&Element::new("td").with_text("")), "<td></td>");
    }

    #[test]
    fn test_flag_attribute() {
        let mut element = Element::new("td").with_text("x");
        element
            .attributes
            .insert("nowrap".to_string(), AttributeValue::Flag);
        assert_eq!(render(&element), "<td nowrap>x</td>");
    }

    #[test]
    fn test_nested_nodes_and_comments() {
        let element = Element::new("p").with_children(vec![
            Node::Text("a ".to_string()),
            Node::Element(Element::new("em").with_text("b")),
            Node::Comment(" note ".to_string()),
        ]);
        assert_eq!(render(&element), "<p>a <em>b</em><!-- note --></p>");
    }

    #[test]
    fn test_comment_body_cannot_close_early() {
        let comment = |body: &str| {
            let mut out = String::new();
            render_comment(body, &mut out);
            out
        };
        assert_eq!(comment("><b>"), "<!--&gt;&lt;b&gt;-->");
        assert_eq!(comment("a---b"), "<!--a- - -b-->");
        assert_eq!(comment(" --!> x"), "<!-- - -!&gt; x-->");
        assert_eq!(comment("tail-"), "<!--tail- -->");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc = Document::new(vec![
            Node::Element(Element::new("h1").with_text("T")),
            Node::Element(Element::new("p").with_class("b").with_class("a").with_text("x")),
        ]);
        let first = render_document(&doc);
        assert_eq!(first, render_document(&doc));
        assert_eq!(first, "<h1>T</h1><p class=\"b a\">x</p>");
    }
}
