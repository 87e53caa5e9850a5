//! Texier core
//!
//! The submodules are layered leaves first: `parsing` depends on nothing else in
//! the crate, `ast` and `validation` are independent of the engine, `modules` ties
//! grammar fragments to elements, and `processor` orchestrates one run.

pub mod ast;
pub mod config;
pub mod formats;
pub mod modules;
pub mod parsing;
pub mod processor;
pub mod validation;

pub use ast::{Content, Document, Element, Modifier, Node, TocEntry};
pub use config::{load_defaults, Loader, TexierConfig};
pub use formats::{render, render_document};
pub use processor::{ProcessingError, Processor};
