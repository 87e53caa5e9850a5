//! Bare URLs: `http://`, `https://`, `ftp://`, `mailto:` and `www.` addresses
//! become links to themselves.

use super::fragments::normalize_target;
use super::SyntaxModule;
use crate::texier::ast::Element;
use crate::texier::parsing::{e, BuildContext, Expression, GrammarError, Namespace, Registry};

const URL: &str = r#"(?i:(?:https?|ftp)://|mailto:|www\.)[^\s<>"\[\]]*[^\s<>"\[\].,;:!?()]"#;

pub struct LinkModule;

impl SyntaxModule for LinkModule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Inline, "link/url", url)
    }
}

fn url(_ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    Ok(e(URL)?.map(|mut captures| {
        let text = captures.pop()?.into_text()?;
        let href = normalize_target(&text)?;
        Some(
            Element::new("a")
                .with_attribute("href", href)
                .with_text(text)
                .into(),
        )
    }))
}
