//! Grammar configuration errors
//!
//! These are programming or configuration defects, reported as soon as they are
//! detected. Ordinary match failures never become a `GrammarError`.

use super::registry::Namespace;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unknown production '{0}'")]
    UnknownProduction(String),

    #[error("production '{name}' is already registered in the {namespace} namespace")]
    DuplicateProduction { namespace: Namespace, name: String },

    #[error("grammar already resolved; productions and options can no longer change")]
    Frozen,

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("missing option '{0}'")]
    MissingOption(String),

    #[error("invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },
}
