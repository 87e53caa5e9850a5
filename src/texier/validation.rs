//! Safety validation
//!
//! Two collaborators consulted while elements are built:
//! - [`Dtd`]: the tag classification table (pairable or empty, block or inline)
//! - [`Policy`]: which tags, attributes, classes and style properties may appear
//!
//! Validation only happens at construction time. A rendered tree is trusted.

pub mod dtd;
pub mod policy;

pub use dtd::{Category, Dtd, Pairing, TagKind};
pub use policy::{AllowListPolicy, DenyAll, Policy, PolicyError};
