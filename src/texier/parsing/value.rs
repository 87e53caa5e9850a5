//! Captured values
//!
//! Every successful match yields an ordered list of captures. A capture is a raw
//! substring, a finished element, a comment payload, a parsed modifier, a nested
//! sequence (from repetition or grouping) or the absence marker produced by an
//! optional expression that did not match.

use crate::texier::ast::{Element, Modifier, Node};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Element(Element),
    Comment(String),
    Modifier(Modifier),
    List(Vec<Value>),
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The raw text of this capture. Sequences of text are concatenated.
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text),
            Value::List(items) => {
                let mut joined = String::new();
                for item in items {
                    joined.push_str(&item.into_text()?);
                }
                Some(joined)
            }
            _ => None,
        }
    }

    /// The members of a sequence capture. Absence is the empty sequence and any
    /// other single value is a sequence of one.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            Value::Absent => Vec::new(),
            other => vec![other],
        }
    }

    pub fn into_modifier(self) -> Option<Modifier> {
        match self {
            Value::Modifier(modifier) => Some(modifier),
            _ => None,
        }
    }

    /// Flatten this capture into document nodes, appending to `out`. Nested
    /// sequences are spliced in order; absence and modifiers carry no content.
    pub fn collect_nodes(self, out: &mut Vec<Node>) {
        match self {
            Value::Text(text) => out.push(Node::Text(text)),
            Value::Element(element) => out.push(Node::Element(element)),
            Value::Comment(text) => out.push(Node::Comment(text)),
            Value::List(items) => {
                for item in items {
                    item.collect_nodes(out);
                }
            }
            Value::Modifier(_) | Value::Absent => {}
        }
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Value::Element(element)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

/// Flatten a capture list into document nodes.
pub fn nodes(values: impl IntoIterator<Item = Value>) -> Vec<Node> {
    let mut out = Vec::new();
    for value in values {
        value.collect_nodes(&mut out);
    }
    out
}

/// Remove and return the first modifier capture at the top level of `values`.
pub fn take_modifier(values: &mut Vec<Value>) -> Option<Modifier> {
    let index = values
        .iter()
        .position(|value| matches!(value, Value::Modifier(_)))?;
    values.remove(index).into_modifier()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_flattens_nested_lists() {
        let values = vec![
            Value::Text("a".to_string()),
            Value::List(vec![
                Value::Absent,
                Value::Text("b".to_string()),
                Value::List(vec![Value::Element(Element::new("em"))]),
            ]),
            Value::Modifier(Modifier::default()),
        ];

        let flat = nodes(values);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], Node::Text("a".to_string()));
        assert!(matches!(&flat[2], Node::Element(e) if e.tag == "em"));
    }

    #[test]
    fn test_into_text_joins_sequences() {
        let value = Value::List(vec![
            Value::Text("ab".to_string()),
            Value::Text("c".to_string()),
        ]);
        assert_eq!(value.into_text().as_deref(), Some("abc"));
        assert_eq!(Value::Absent.into_text(), None);
    }

    #[test]
    fn test_take_modifier() {
        let mut values = vec![
            Value::Text("x".to_string()),
            Value::Modifier(Modifier::with_classes(["foo"])),
        ];
        let modifier = take_modifier(&mut values).expect("modifier present");
        assert_eq!(modifier.classes, vec!["foo".to_string()]);
        assert_eq!(values.len(), 1);
        assert!(take_modifier(&mut values).is_none());
    }
}
