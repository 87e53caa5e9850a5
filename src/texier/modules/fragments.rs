//! Expressions shared between modules: the modifier micro-syntax, link
//! suffixes and phrase text.

use crate::texier::ast::Modifier;
use crate::texier::config::PhraseConfig;
use crate::texier::parsing::{e, lit, not, BuildContext, Expression, GrammarError, Value};
use crate::texier::validation::Policy;

/// Schemes a link target may use. Targets without a scheme are relative.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto"];

/// `.[class #id]` and `.{name: value}` groups after a dot, optionally preceded
/// by blanks. Tokens the policy denies are dropped.
pub fn modifier(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let policy = ctx.policy();
    let group = e(r"\[[^\]\n]+\]")? | e(r"\{[^}\n]+\}")?;
    Ok((e(r"[ \t]*\.")?.skip() & group.one_or_more()).map(move |captures| {
        let mut modifier = Modifier::default();
        for group in captures.into_iter().flat_map(Value::into_list) {
            let group = group.into_text()?;
            if let Some(inner) = group.strip_prefix('[').and_then(|g| g.strip_suffix(']')) {
                apply_classes(&mut modifier, inner, policy.as_ref());
            } else if let Some(inner) = group.strip_prefix('{').and_then(|g| g.strip_suffix('}')) {
                apply_styles(&mut modifier, inner, policy.as_ref());
            }
        }
        Some(Value::Modifier(modifier))
    }))
}

fn apply_classes(modifier: &mut Modifier, tokens: &str, policy: &dyn Policy) {
    for token in tokens.split_whitespace() {
        if !policy.class_allowed(token) {
            continue;
        }
        match token.strip_prefix('#') {
            Some(id) if !id.is_empty() => modifier.id = Some(id.to_string()),
            Some(_) => {}
            None => modifier.add_class(token),
        }
    }
}

fn apply_styles(modifier: &mut Modifier, declarations: &str, policy: &dyn Policy) {
    for declaration in declarations.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if !name.is_empty() && !value.is_empty() && policy.style_allowed(&name) {
            modifier.style.insert(name, value.to_string());
        }
    }
}

/// `:[target]` or `:target`, yielding the validated target as text. Never
/// matches when links are disabled.
pub fn link(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let phrase: PhraseConfig = ctx.option("phrase")?;
    if !phrase.links_allowed {
        return Ok(Expression::nothing());
    }
    let bracketed = e(r"\[[^\]\n]+\]")?;
    let bare = e(r#"[^\s<>"\[\]]*[^\s<>"\[\].,;:!?()]"#)?;
    Ok((lit(":").skip() & (bracketed | bare)).map(|mut captures| {
        let target = captures.pop()?.into_text()?;
        let target = target
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(&target)
            .trim();
        normalize_target(target).map(Value::Text)
    }))
}

/// Checks the scheme of a link target and completes `www.` addresses.
///
/// Tabs and line breaks are removed first, the way browsers read URLs; any
/// other control character rejects the target.
pub fn normalize_target(target: &str) -> Option<String> {
    let target: String = target
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    if target.is_empty() || target.chars().any(char::is_control) {
        return None;
    }
    if let Some(scheme) = scheme_of(&target) {
        return ALLOWED_SCHEMES
            .contains(&scheme.to_ascii_lowercase().as_str())
            .then_some(target);
    }
    if target.starts_with("www.") {
        return Some(format!("http://{}", target));
    }
    Some(target)
}

fn scheme_of(target: &str) -> Option<&str> {
    let (scheme, _) = target.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    (first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')))
    .then_some(scheme)
}

/// Text of a phrase, scanned unit by unit up to `terminator`. Never crosses
/// a blank line. Captures the scanned units as one sequence (see
/// [`Value::into_text`]) followed by the terminator's captures.
pub fn phrase_text(terminator: Expression) -> Result<Expression, GrammarError> {
    let unit = e(r"[^\n]")? | (lit("\n") & not(e(r"[ \t]*(?:\n|\z)")?));
    Ok(unit.one_or_more().up_to(terminator))
}
