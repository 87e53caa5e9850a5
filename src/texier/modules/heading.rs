//! Headings
//!
//! Two syntaxes, both recording a raw level on the element:
//! - surrounded: `### Title ###`, 2 to 7 `#` or `=` marks
//! - underlined: a line followed by `###`, `***`, `===` or `---`
//!
//! Final levels, ids and the table of contents are settled once the whole
//! document is known, in [`HeadingModule::finish`].

use super::fragments::modifier;
use super::SyntaxModule;
use crate::texier::ast::{Document, Element, Modifier, TocEntry};
use crate::texier::config::{Balancing, HeadingConfig};
use crate::texier::parsing::{
    e, lit, nodes, take_modifier, BuildContext, Expression, GrammarError, Namespace, Registry,
    Value,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub struct HeadingModule;

impl SyntaxModule for HeadingModule {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Block, "heading/surrounded", surrounded)?;
        registry.register(Namespace::Block, "heading/underlined", underlined)?;
        Ok(())
    }

    fn finish(&self, registry: &Registry, document: &mut Document) {
        let config: HeadingConfig = match registry.option("heading") {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "heading options unavailable, leaving headings untouched");
                return;
            }
        };

        let mut headings = Vec::new();
        collect_headings(&mut document.root, &mut headings);
        if headings.is_empty() {
            return;
        }

        let levels = resolve_levels(
            &config,
            headings.iter().filter_map(|heading| heading.outline_level),
        );
        let mut used_ids = BTreeSet::new();
        for heading in headings {
            let Some(raw) = heading.outline_level.take() else {
                continue;
            };
            let level = levels.get(&raw).copied().unwrap_or(1);
            heading.tag = format!("h{}", level);

            let text = heading.text_content();
            if config.generate_id && heading.id.is_none() {
                heading.id = Some(unique_id(&config.id_prefix, &text, &mut used_ids));
            }
            if let Some(id) = &heading.id {
                used_ids.insert(id.clone());
            }
            if document.title.is_none() {
                document.title = Some(text.clone());
            }
            document.toc.push(TocEntry {
                level,
                text,
                id: heading.id.clone(),
            });
        }
    }
}

fn surrounded(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let config: HeadingConfig = ctx.option("heading")?;
    let opening = e(r"(?:#{2,7}|={2,7})[ \t]+")?;
    let closing = modifier(ctx)?.maybe() & e(r"(?:[ \t]+[#=]+)?[ \t]*$")?.skip();
    let heading = opening & ctx.inline_content().one_or_more().up_to(closing);

    Ok(heading.map(move |mut captures| {
        let modifier = take_modifier(&mut captures);
        let marks = captures.remove(0).into_text()?.trim_end().chars().count();
        let raw = if config.more_means_higher {
            8 - marks
        } else {
            marks - 1
        };
        Some(heading_element(raw as u8, captures, modifier.as_ref()))
    }))
}

fn underlined(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let line = ctx
        .inline_content()
        .one_or_more()
        .up_to(modifier(ctx)?.maybe() & lit("\n").skip());
    let underline = e(r"(?:#{3,}|\*{3,}|={3,}|-{3,})[ \t]*$")?;

    Ok((line & underline).map(|mut captures| {
        let underline = captures.pop()?.into_text()?;
        let raw = match underline.chars().next()? {
            '#' => 1,
            '*' => 2,
            '=' => 3,
            _ => 4,
        };
        let modifier = take_modifier(&mut captures);
        Some(heading_element(raw, captures, modifier.as_ref()))
    }))
}

fn heading_element(
    raw: u8,
    content: Vec<Value>,
    modifier: Option<&Modifier>,
) -> Value {
    let mut element = Element::new(format!("h{}", raw.clamp(1, 6)))
        .with_children(nodes(content))
        .modify(modifier);
    element.outline_level = Some(raw);
    element.into()
}

/// Headings in document order. Headings are not searched for headings.
fn collect_headings<'a>(element: &'a mut Element, out: &mut Vec<&'a mut Element>) {
    for child in element.child_elements_mut() {
        if child.outline_level.is_some() {
            out.push(child);
        } else {
            collect_headings(child, out);
        }
    }
}

/// Final level of every raw level used in the document, clamped to 1..=6.
fn resolve_levels(config: &HeadingConfig, raw: impl Iterator<Item = u8>) -> BTreeMap<u8, u8> {
    let used: BTreeSet<u8> = raw.collect();
    let top = config.top.clamp(1, 6);
    used.iter()
        .enumerate()
        .map(|(rank, &raw)| {
            let level = match config.balancing {
                Balancing::Dynamic => usize::from(top) + rank,
                Balancing::Fixed => usize::from(raw) + usize::from(top) - 1,
            };
            (raw, level.clamp(1, 6) as u8)
        })
        .collect()
}

/// Lowercase words joined by hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(word.chars().flat_map(char::to_lowercase));
    }
    slug
}

fn unique_id(prefix: &str, text: &str, used: &mut BTreeSet<String>) -> String {
    let base = format!("{}{}", prefix, slugify(text));
    let mut candidate = base.clone();
    let mut counter = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}
