//! Lists
//!
//! The `list` production is an ordered choice over the configured bullet
//! table, so the first matching row decides the list type. Rows with a `next`
//! marker match it on every item after the first one (`I.`, `II`, `III`).
//!
//! An item is a bullet, one line of inline content with an optional trailing
//! modifier, and optionally a block of deeper-indented lines parsed as block
//! content.

use super::fragments::modifier;
use super::SyntaxModule;
use crate::texier::ast::Element;
use crate::texier::config::{BulletConfig, ListConfig};
use crate::texier::parsing::{
    e, lit, nodes, take_modifier, BuildContext, Expression, GrammarError, Namespace, Registry,
};

/// Marker of definition items.
const DEFINITION_BULLET: &str = r"-[ \t]+";

pub struct ListModule;

impl SyntaxModule for ListModule {
    fn name(&self) -> &'static str {
        "list"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Block, "list", list)?;
        registry.register(Namespace::Block, "list/definition", definition)?;
        Ok(())
    }
}

fn list(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let config: ListConfig = ctx.option("list")?;
    let modifier = modifier(ctx)?;
    let lists = config
        .bullets
        .iter()
        .map(|bullet| bullet_list(ctx, bullet, &modifier))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::choice(lists))
}

fn bullet_list(
    ctx: &BuildContext<'_>,
    bullet: &BulletConfig,
    modifier: &Expression,
) -> Result<Expression, GrammarError> {
    let separator = e(r"\n(?:[ \t]*\n)*")?;
    let first = item(ctx, &bullet.pattern, "li", modifier)?;
    let items = match &bullet.next {
        Some(next) => {
            let following = item(ctx, next, "li", modifier)?;
            first & (separator.clone().skip() & following.separated_by(separator)).maybe()
        }
        None => first.separated_by(separator),
    };
    let list = (modifier.clone() & lit("\n").skip()).maybe() & items;

    let tag = if bullet.ordered { "ol" } else { "ul" };
    let style = bullet.style.clone();
    Ok(list.map(move |mut captures| {
        let modifier = take_modifier(&mut captures);
        let mut element = Element::new(tag).with_children(nodes(captures));
        if let Some(style) = &style {
            element
                .style
                .insert("list-style-type".to_string(), style.clone());
        }
        Some(element.modify(modifier.as_ref()).into())
    }))
}

fn item(
    ctx: &BuildContext<'_>,
    bullet: &str,
    tag: &'static str,
    modifier: &Expression,
) -> Result<Expression, GrammarError> {
    let bullet = e(bullet)?.skip();
    let first_line = ctx
        .inline_content()
        .one_or_more()
        .up_to(modifier.clone().maybe() & e(r"[ \t]*$")?.skip());
    let blocks = ctx
        .block_content()
        .one_or_more()
        .separated_by(e(r"\n*")?)
        .indented();
    let item = bullet & first_line & (e(r"\n+")?.skip() & blocks).maybe();

    Ok(item.map(move |mut captures| {
        let modifier = take_modifier(&mut captures);
        Some(
            Element::new(tag)
                .with_children(nodes(captures))
                .modify(modifier.as_ref())
                .into(),
        )
    }))
}

/// `term:` on its own line, followed by indented `- definition` items.
fn definition(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let modifier = modifier(ctx)?;
    let term = ctx
        .inline_content()
        .one_or_more()
        .up_to(lit(":").skip())
        .map(|captures| Some(Element::new("dt").with_children(nodes(captures)).into()));
    let definitions = item(ctx, DEFINITION_BULLET, "dd", &modifier)?
        .separated_by(e(r"\n+")?)
        .indented();
    let list = term & modifier.maybe() & lit("\n").skip() & definitions;

    Ok(list.map(|mut captures| {
        let modifier = take_modifier(&mut captures);
        Some(
            Element::new("dl")
                .with_children(nodes(captures))
                .modify(modifier.as_ref())
                .into(),
        )
    }))
}
