//! Syntax modules
//!
//! Each module contributes productions to the registry and may post-process the
//! parsed document. Modules are registered in a fixed order, which is also the
//! tie-break between their productions:
//!
//! 1. `html`: passthrough tags and comments
//! 2. `heading`: surrounded and underlined headings
//! 3. `list`: bullet lists and definition lists
//! 4. `table`
//! 5. `paragraph`
//! 6. `phrase`: inline emphasis, spans, acronyms, quick links
//! 7. `smilies`
//! 8. `link`: bare URLs

pub mod fragments;
pub mod heading;
pub mod html;
pub mod link;
pub mod list;
pub mod paragraph;
pub mod phrase;
pub mod smilies;
pub mod table;

use crate::texier::ast::Document;
use crate::texier::parsing::{GrammarError, Registry};

pub use heading::HeadingModule;
pub use html::HtmlModule;
pub use link::LinkModule;
pub use list::ListModule;
pub use paragraph::ParagraphModule;
pub use phrase::PhraseModule;
pub use smilies::SmiliesModule;
pub use table::TableModule;

pub trait SyntaxModule: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError>;

    /// Runs once per document after parsing.
    fn finish(&self, _registry: &Registry, _document: &mut Document) {}
}

/// All modules, in registration order.
pub fn standard_modules() -> Vec<Box<dyn SyntaxModule>> {
    vec![
        Box::new(HtmlModule),
        Box::new(HeadingModule),
        Box::new(ListModule),
        Box::new(TableModule),
        Box::new(ParagraphModule),
        Box::new(PhraseModule),
        Box::new(SmiliesModule),
        Box::new(LinkModule),
    ]
}
