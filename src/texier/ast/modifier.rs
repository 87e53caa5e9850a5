//! Modifiers: class, id and style attached to an element by the `.[...]` and
//! `.{...}` micro-syntax.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifier {
    /// Unique, in insertion order.
    pub classes: Vec<String>,
    pub id: Option<String>,
    pub style: BTreeMap<String, String>,
}

impl Modifier {
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut modifier = Self::default();
        for class in classes {
            modifier.add_class(class);
        }
        modifier
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Fold `other` into `self`: classes are united, a present id and style
    /// entries override.
    pub fn merge(&mut self, other: Modifier) {
        for class in other.classes {
            self.add_class(class);
        }
        if other.id.is_some() {
            self.id = other.id;
        }
        self.style.extend(other.style);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.id.is_none() && self.style.is_empty()
    }
}
