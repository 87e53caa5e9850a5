//! HTML passthrough
//!
//! Every tag of the tag table gets its own alternative. Block tags live in the
//! block namespace and may contain further block tags, inline content and line
//! breaks; inline tags contain inline content only. Attributes are parsed by
//! small sub-grammars and filtered by the policy.
//!
//! A tag the policy denies gets no alternative at all, so the surrounding choice
//! falls through to the next production, and eventually to literal text, one
//! character at a time. Markup nested inside a rejected tag is still matched on
//! its own.

use super::fragments::normalize_target;
use super::SyntaxModule;
use crate::texier::ast::{AttributeValue, Element};
use crate::texier::config::HtmlConfig;
use crate::texier::parsing::{
    e, everything_up_to, lit, not, nodes, BuildContext, Expression, GrammarError, Namespace,
    Registry, Value,
};
use crate::texier::validation::{Category, Pairing, Policy};

pub struct HtmlModule;

impl SyntaxModule for HtmlModule {
    fn name(&self) -> &'static str {
        "html"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Block, "html/tag", |ctx| {
            let nested = ctx.production(Namespace::Block, "html/tag")?;
            let content = nested | ctx.inline_content() | lit("\n");
            tags(ctx, Category::Block, content)
        })?;
        registry.register(Namespace::Inline, "html/tag", |ctx| {
            tags(ctx, Category::Inline, ctx.inline_content() | lit("\n"))
        })?;
        registry.register(Namespace::Block, "html/comment", comment)?;
        registry.register(Namespace::Inline, "html/comment", comment)?;
        Ok(())
    }
}

/// Sub-grammars for the two structured attributes.
#[derive(Clone)]
struct AttributeGrammar {
    /// Whitespace separated class tokens.
    classes: Expression,
    /// `name: value` pairs separated by semicolons.
    styles: Expression,
}

impl AttributeGrammar {
    fn new() -> Result<Self, GrammarError> {
        let classes = e(r"\s*")?.skip() & e(r"\S+")?.separated_by(e(r"\s+")?);
        let declaration = e(r"[^:;\s]+")? & e(r"\s*:\s*")?.skip() & e(r"[^;]*[^;\s]")?;
        let styles = e(r"[\s;]*")?.skip() & declaration.group().separated_by(e(r"\s*;[\s;]*")?);
        Ok(Self { classes, styles })
    }

    fn class_tokens(&self, value: &str) -> Vec<String> {
        self.classes
            .parse_text(value)
            .map(|success| {
                success
                    .captures
                    .into_iter()
                    .flat_map(Value::into_list)
                    .filter_map(Value::into_text)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Property names are lowercased.
    fn style_declarations(&self, value: &str) -> Vec<(String, String)> {
        let Some(success) = self.styles.parse_text(value) else {
            return Vec::new();
        };
        success
            .captures
            .into_iter()
            .flat_map(Value::into_list)
            .filter_map(|declaration| {
                let mut parts = declaration.into_list().into_iter();
                let property = parts.next()?.into_text()?.to_ascii_lowercase();
                let setting = parts.next()?.into_text()?;
                Some((property, setting))
            })
            .collect()
    }
}

/// One alternative per tag of `category`: pairs first, then empty tags.
fn tags(ctx: &BuildContext<'_>, category: Category, content: Expression) -> Result<Expression, GrammarError> {
    let attributes = attributes()?;
    let sub = AttributeGrammar::new()?;
    let mut pairs = Vec::new();
    let mut empties = Vec::new();

    let policy = ctx.policy();
    let allowed = ctx
        .dtd()
        .tags()
        .filter(|(tag, kind)| kind.category == category && policy.tag_allowed(tag));
    for (tag, kind) in allowed {
        let policy = policy.clone();
        let sub = sub.clone();
        let open = lit(&format!("<{}", tag)).skip() & not(e("[A-Za-z0-9]")?) & attributes.clone();
        match kind.pairing {
            Pairing::Pair => {
                let close = e(&format!(r"</{}\s*>", tag))?.skip();
                let element = open & e(r"\s*>")?.skip() & content.clone().zero_or_more().up_to(close);
                pairs.push(element.map(move |mut captures| {
                    let children = captures.pop()?;
                    let attributes = captures.pop()?;
                    let element = build(policy.as_ref(), &sub, tag, attributes)?;
                    Some(element.with_children(nodes([children])).into())
                }));
            }
            Pairing::Empty => {
                let element = open & e(r"\s*/?>")?.skip();
                empties.push(element.map(move |mut captures| {
                    let attributes = captures.pop()?;
                    Some(build(policy.as_ref(), &sub, tag, attributes)?.into())
                }));
            }
        }
    }

    Ok(Expression::choice(pairs.into_iter().chain(empties)))
}

/// Attributes as a sequence of `[name, value or absent]` pairs.
fn attributes() -> Result<Expression, GrammarError> {
    let name = e(r"[a-zA-Z][a-zA-Z0-9_:.-]*")?;
    let value = (lit("\"").skip() & e(r#"[^"]*"#)? & lit("\"").skip())
        | (lit("'").skip() & e(r"[^']*")? & lit("'").skip())
        | e(r#"[^\s"'<>/=`]+"#)?;
    let attribute = e(r"\s+")?.skip() & name & (e(r"\s*=\s*")?.skip() & value).maybe();
    Ok(attribute.group().zero_or_more())
}

/// `None` when the tag carries a link with a forbidden scheme.
fn build(policy: &dyn Policy, sub: &AttributeGrammar, tag: &str, attributes: Value) -> Option<Element> {
    let mut element = Element::new(tag);
    for attribute in attributes.into_list() {
        let mut pair = attribute.into_list().into_iter();
        let name = pair.next()?.into_text()?.to_ascii_lowercase();
        let value = pair.next().and_then(Value::into_text);

        if !policy.attribute_allowed(tag, &name) {
            continue;
        }
        match (name.as_str(), value) {
            ("class", Some(value)) => {
                for token in sub.class_tokens(&value) {
                    if policy.class_allowed(&token) {
                        element.add_class(token);
                    }
                }
            }
            ("id", Some(value)) => {
                if policy.class_allowed(&format!("#{}", value)) {
                    element.id = Some(value);
                }
            }
            ("style", Some(value)) => {
                for (property, setting) in sub.style_declarations(&value) {
                    if policy.style_allowed(&property) {
                        element.style.insert(property, setting);
                    }
                }
            }
            ("href" | "src", Some(value)) => {
                let target = normalize_target(value.trim())?;
                element
                    .attributes
                    .insert(name, AttributeValue::Text(target));
            }
            (_, Some(value)) => {
                element.attributes.insert(name, AttributeValue::Text(value));
            }
            (_, None) => {
                element.attributes.insert(name, AttributeValue::Flag);
            }
        }
    }
    Some(element)
}

/// `<!-- ... -->`, kept as a comment node or dropped together with the blanks
/// that follow it. A malformed comment is left to the text fallback.
fn comment(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let config: HtmlConfig = ctx.option("html")?;
    let comment = (lit("<!--").skip() & everything_up_to(lit("-->").skip())).map(|mut captures| {
        let body = captures.pop()?.into_text()?;
        well_formed_comment(&body).then(|| Value::Comment(body))
    });
    if config.pass_comments {
        Ok(comment)
    } else {
        Ok((comment & e(r"[ \t]*")?).skip())
    }
}

/// Browsers end a comment at `<!-->`, `<!--->` and `--!>`, so such bodies are
/// not comments here either.
fn well_formed_comment(body: &str) -> bool {
    !(body.starts_with('>') || body.starts_with("->") || body.contains("--") || body.ends_with('-'))
}
