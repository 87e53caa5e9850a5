//! Paragraphs: inline content and line breaks up to a blank line or the end
//! of input, with an optional trailing modifier.

use super::fragments::modifier;
use super::SyntaxModule;
use crate::texier::ast::Element;
use crate::texier::parsing::{
    e, lit, nodes, take_modifier, BuildContext, Expression, GrammarError, Namespace, Registry,
};

pub struct ParagraphModule;

impl SyntaxModule for ParagraphModule {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Block, "paragraph", paragraph)
    }
}

fn paragraph(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let end = modifier(ctx)?.maybe() & e(r"[ \t]*(?:\n[ \t]*\n|\n?[ \t]*\z)")?.skip();
    let paragraph = (ctx.inline_content() | lit("\n")).one_or_more().up_to(end);

    Ok(paragraph.map(|mut captures| {
        let modifier = take_modifier(&mut captures);
        Some(
            Element::new("p")
                .with_children(nodes(captures))
                .modify(modifier.as_ref())
                .into(),
        )
    }))
}
