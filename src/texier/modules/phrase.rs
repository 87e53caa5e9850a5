//! Inline phrases: emphasis, code, quotes, spans, acronyms and quick links.
//!
//! Simple phrases share one shape: an opening mark that is not followed by its
//! own first character, text up to an optional modifier and the closing mark,
//! then an optional `:link` that wraps the phrase in `<a href>`. The modifier
//! lands on the outermost element.

use super::fragments::{link, modifier, phrase_text};
use super::SyntaxModule;
use crate::texier::ast::{Element, Node};
use crate::texier::parsing::{
    e, everything_up_to, lit, not, BuildContext, Expression, GrammarError, Namespace, Registry,
    Value,
};

/// U+2212, used for negative exponents and indices.
pub const MINUS: &str = "\u{2212}";

/// Name, mark and nested tags (outermost first) of each simple phrase, longest
/// marks first.
const SIMPLE_PHRASES: &[(&str, &str, &[&str])] = &[
    ("phrase/strong+em", "***", &["strong", "em"]),
    ("phrase/strong", "**", &["strong"]),
    ("phrase/em", "*", &["em"]),
    ("phrase/em-alt", "//", &["em"]),
    ("phrase/code", "`", &["code"]),
    ("phrase/ins", "++", &["ins"]),
    ("phrase/del", "--", &["del"]),
    ("phrase/sup", "^^", &["sup"]),
    ("phrase/sub", "__", &["sub"]),
    ("phrase/cite", "~~", &["cite"]),
];

pub struct PhraseModule;

impl SyntaxModule for PhraseModule {
    fn name(&self) -> &'static str {
        "phrase"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        for &(name, mark, tags) in SIMPLE_PHRASES {
            registry.register(Namespace::Inline, name, move |ctx| simple_phrase(ctx, mark, tags))?;
        }
        registry.register(Namespace::Inline, "phrase/quote", quote)?;
        registry.register(Namespace::Inline, "phrase/sup-alt", |_| index("^", "sup"))?;
        registry.register(Namespace::Inline, "phrase/sub-alt", |_| index("_", "sub"))?;
        registry.register(Namespace::Inline, "phrase/acronym", |_| acronym())?;
        registry.register(Namespace::Inline, "phrase/span", |ctx| span(ctx, "\""))?;
        registry.register(Namespace::Inline, "phrase/span-alt", |ctx| span(ctx, "~"))?;
        registry.register(Namespace::Inline, "phrase/quicklink", quicklink)?;
        registry.register(Namespace::Inline, "phrase/notexy", |_| notexy())?;
        Ok(())
    }
}

fn mark(text: &str) -> Expression {
    (lit(text) & not(lit(&text[..1]))).skip()
}

fn simple_phrase(
    ctx: &BuildContext<'_>,
    text: &str,
    tags: &'static [&'static str],
) -> Result<Expression, GrammarError> {
    let mark = mark(text);
    let phrase = mark.clone() & phrase_text(modifier(ctx)?.maybe() & mark)? & link(ctx)?.maybe();

    Ok(phrase.map(move |mut captures| {
        let url = captures.pop()?;
        let modifier = captures.pop()?.into_modifier();
        let content = captures.pop()?.into_text()?;

        let (innermost, outer) = tags.split_last()?;
        let mut element = Element::new(*innermost).with_text(content);
        for tag in outer.iter().rev() {
            element = Element::new(*tag).with_children(vec![Node::Element(element)]);
        }
        if let Value::Text(url) = url {
            element = Element::new("a")
                .with_attribute("href", url)
                .with_children(vec![Node::Element(element)]);
        }
        Some(element.modify(modifier.as_ref()).into())
    }))
}

/// `>>quoted<<`, optionally followed by a link used as `cite`.
fn quote(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let quote = lit(">>").skip()
        & phrase_text(modifier(ctx)?.maybe() & lit("<<").skip())?
        & link(ctx)?.maybe();

    Ok(quote.map(|mut captures| {
        let url = captures.pop()?;
        let modifier = captures.pop()?.into_modifier();
        let content = captures.pop()?.into_text()?;

        let mut element = Element::new("q").with_text(content);
        if let Value::Text(url) = url {
            element = element.with_attribute("cite", url);
        }
        Some(element.modify(modifier.as_ref()).into())
    }))
}

/// `x^2` and `x_2`: a letter or digit, the mark and a possibly negative integer.
fn index(mark: &str, tag: &'static str) -> Result<Expression, GrammarError> {
    let index = e("[a-z0-9]")? & lit(mark).skip() & e(r"-?\d+")? & not(e(r"\w")?);
    Ok(index.map(move |mut captures| {
        let number = captures.pop()?.into_text()?;
        let base = captures.pop()?;
        let element = Element::new(tag).with_text(number.replace('-', MINUS));
        Some(Value::List(vec![base, element.into()]))
    }))
}

/// `ABC((meaning))` or `"a b"((meaning))`.
fn acronym() -> Result<Expression, GrammarError> {
    let content = e(r#"\w{2,}|"[^"\n]+""#)?;
    let acronym = content & lit("((").skip() & phrase_text(lit("))").skip())?;
    Ok(acronym.map(|mut captures| {
        let meaning = captures.pop()?.into_text()?;
        let content = captures.pop()?.into_text()?;
        let content = content.trim_matches('"');
        Some(
            Element::new("acronym")
                .with_attribute("title", meaning)
                .with_text(content)
                .into(),
        )
    }))
}

/// Quoted text that needs a link, a modifier or both. Without either it is
/// left alone.
fn span(ctx: &BuildContext<'_>, text: &str) -> Result<Expression, GrammarError> {
    let mark = lit(text).skip();
    let modifier = modifier(ctx)?;

    let with_link = mark.clone()
        & phrase_text(modifier.clone().maybe() & mark.clone())?
        & link(ctx)?;
    let with_link = with_link.map(|mut captures| {
        let url = captures.pop()?.into_text()?;
        let modifier = captures.pop()?.into_modifier();
        let content = captures.pop()?.into_text()?;
        Some(
            Element::new("a")
                .with_attribute("href", url)
                .with_text(content)
                .modify(modifier.as_ref())
                .into(),
        )
    });

    let with_modifier = mark.clone() & phrase_text(modifier & mark)?;
    let with_modifier = with_modifier.map(|mut captures| {
        let modifier = captures.pop()?.into_modifier();
        let content = captures.pop()?.into_text()?;
        Some(
            Element::new("span")
                .with_text(content)
                .modify(modifier.as_ref())
                .into(),
        )
    });

    Ok(with_link | with_modifier)
}

/// `word:target`. Full URLs are left to the link module.
fn quicklink(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let url_start = e(r"(?i)(?:https?|ftp|mailto):|www\.")?;
    let quicklink = not(url_start) & e(r"[^\s:]+")? & link(ctx)?;
    Ok(quicklink.map(|mut captures| {
        let url = captures.pop()?.into_text()?;
        let content = captures.pop()?.into_text()?;
        Some(
            Element::new("a")
                .with_attribute("href", url)
                .with_text(content)
                .into(),
        )
    }))
}

/// `''text''` is emitted verbatim, without further markup.
fn notexy() -> Result<Expression, GrammarError> {
    Ok(lit("''").skip() & everything_up_to(lit("''").skip()))
}
