//! Validation policy
//!
//! The policy answers four questions while elements are built. Everything is
//! denied unless the policy says otherwise; there is no implicit default.

use super::dtd::Dtd;
use crate::texier::config::PolicyConfig;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Marker that allows every name in an allow-list.
pub const ANY: &str = "*";

pub trait Policy: Send + Sync {
    fn tag_allowed(&self, tag: &str) -> bool;

    fn attribute_allowed(&self, tag: &str, name: &str) -> bool;

    /// Checks one class token. Ids are checked here too, as `#id`.
    fn class_allowed(&self, token: &str) -> bool;

    fn style_allowed(&self, property: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("policy allows tag '{0}', which is not a known HTML tag")]
    UnknownTag(String),
}

/// Denies everything. Passthrough HTML always degrades to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Policy for DenyAll {
    fn tag_allowed(&self, _tag: &str) -> bool {
        false
    }

    fn attribute_allowed(&self, _tag: &str, _name: &str) -> bool {
        false
    }

    fn class_allowed(&self, _token: &str) -> bool {
        false
    }

    fn style_allowed(&self, _property: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Allowed {
    Any,
    Only(BTreeSet<String>),
}

impl Allowed {
    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = BTreeSet::new();
        for name in names {
            if name == ANY {
                return Allowed::Any;
            }
            set.insert(name.to_ascii_lowercase());
        }
        Allowed::Only(set)
    }

    fn permits(&self, name: &str) -> bool {
        match self {
            Allowed::Any => true,
            Allowed::Only(set) => set.contains(&name.to_ascii_lowercase()),
        }
    }
}

impl Default for Allowed {
    fn default() -> Self {
        Allowed::Only(BTreeSet::new())
    }
}

/// Allow-lists of tags (each with its attributes), attributes valid on every
/// allowed tag, class tokens and style properties.
#[derive(Debug, Clone, Default)]
pub struct AllowListPolicy {
    tags: BTreeMap<String, Allowed>,
    global_attributes: Allowed,
    classes: Allowed,
    styles: Allowed,
}

impl AllowListPolicy {
    /// Nothing allowed yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PolicyConfig, dtd: &Dtd) -> Result<Self, PolicyError> {
        let mut policy = Self::new()
            .allow_global_attributes(config.global_attributes.iter().map(String::as_str))
            .allow_classes(config.classes.iter().map(String::as_str))
            .allow_styles(config.styles.iter().map(String::as_str));
        for (tag, attributes) in &config.tags {
            if !dtd.contains(tag) {
                return Err(PolicyError::UnknownTag(tag.clone()));
            }
            policy = policy.allow_tag(tag, attributes.iter().map(String::as_str));
        }
        Ok(policy)
    }

    pub fn allow_tag<'a>(mut self, tag: &str, attributes: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags
            .insert(tag.to_ascii_lowercase(), Allowed::from_names(attributes));
        self
    }

    pub fn allow_global_attributes<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.global_attributes = Allowed::from_names(names);
        self
    }

    pub fn allow_classes<'a>(mut self, tokens: impl IntoIterator<Item = &'a str>) -> Self {
        self.classes = Allowed::from_names(tokens);
        self
    }

    pub fn allow_styles<'a>(mut self, properties: impl IntoIterator<Item = &'a str>) -> Self {
        self.styles = Allowed::from_names(properties);
        self
    }
}

impl Policy for AllowListPolicy {
    fn tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains_key(&tag.to_ascii_lowercase())
    }

    fn attribute_allowed(&self, tag: &str, name: &str) -> bool {
        match self.tags.get(&tag.to_ascii_lowercase()) {
            Some(allowed) => allowed.permits(name) || self.global_attributes.permits(name),
            None => false,
        }
    }

    fn class_allowed(&self, token: &str) -> bool {
        self.classes.permits(token)
    }

    fn style_allowed(&self, property: &str) -> bool {
        self.styles.permits(property)
    }
}
