//! Document tree
//!
//! Elements are built by grammar transforms and owned by their parent; the tree
//! has no shared or back references. A [`Document`] wraps the root element with
//! the outline collected while finishing the parse.

pub mod document;
pub mod element;
pub mod modifier;

pub use document::{Document, TocEntry};
pub use element::{AttributeValue, Content, Element, Node};
pub use modifier::Modifier;
