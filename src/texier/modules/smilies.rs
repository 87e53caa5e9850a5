//! Smilies: configured glyphs become images. A glyph may repeat its last
//! character (`:-)))`).

use super::SyntaxModule;
use crate::texier::ast::Element;
use crate::texier::config::SmiliesConfig;
use crate::texier::parsing::{e, BuildContext, Expression, GrammarError, Namespace, Registry};

pub struct SmiliesModule;

impl SyntaxModule for SmiliesModule {
    fn name(&self) -> &'static str {
        "smilies"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Inline, "smilies", smilies)
    }
}

fn smilies(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let config: SmiliesConfig = ctx.option("smilies")?;
    let mut icons = config.icons;
    icons.retain(|icon| !icon.glyph.is_empty());
    if icons.is_empty() {
        return Ok(Expression::nothing());
    }
    // longer glyphs first, so that a glyph never shadows one it prefixes
    icons.sort_by(|a, b| b.glyph.len().cmp(&a.glyph.len()));

    let pattern = icons
        .iter()
        .map(|icon| format!("{}+", regex::escape(&icon.glyph)))
        .collect::<Vec<_>>()
        .join("|");
    let root = config.root;
    let class = config.class;

    Ok(e(&pattern)?.map(move |mut captures| {
        let matched = captures.pop()?.into_text()?;
        let icon = icons.iter().find(|icon| matched.starts_with(&icon.glyph))?;
        let mut element = Element::new("img")
            .with_attribute("src", format!("{}{}", root, icon.file))
            .with_attribute("alt", icon.glyph.clone());
        if let Some(class) = &class {
            element.add_class(class.clone());
        }
        Some(element.into())
    }))
}
