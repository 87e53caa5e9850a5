//! Output formats
//!
//! HTML is the only output. The renderer takes validated trees and never fails.

pub mod html;

pub use html::{render, render_document};
