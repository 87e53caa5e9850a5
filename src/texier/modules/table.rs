//! Tables
//!
//! ```text
//! |------------
//! | Name | Age
//! |------------
//! | Ann  | 31
//! ```
//!
//! Rows between two separator rows form the head, the remaining rows the
//! body. A negative lookahead keeps separator rows from being read as data.

use super::SyntaxModule;
use crate::texier::ast::Element;
use crate::texier::parsing::{
    e, lit, nodes, not, BuildContext, Expression, GrammarError, Namespace, Registry,
};

const HEAD_SEPARATOR: &str = r"[ \t]*\|[-+|]{3,}[ \t]*";

pub struct TableModule;

impl SyntaxModule for TableModule {
    fn name(&self) -> &'static str {
        "table"
    }

    fn register(&self, registry: &mut Registry) -> Result<(), GrammarError> {
        registry.register(Namespace::Block, "table", table)
    }
}

fn table(ctx: &BuildContext<'_>) -> Result<Expression, GrammarError> {
    let newline = lit("\n").skip();
    let opening = e(&format!(r"{}\n", HEAD_SEPARATOR))?.skip();
    let closing = e(&format!(r"\n{}$", HEAD_SEPARATOR))?.skip();

    let head = (opening & row(ctx, "th")?.separated_by(newline.clone()) & closing)
        .map(|captures| Some(Element::new("thead").with_children(nodes(captures)).into()));
    let body = row(ctx, "td")?
        .separated_by(newline.clone())
        .map(|captures| Some(Element::new("tbody").with_children(nodes(captures)).into()));

    let table = (head.clone() & newline & body.clone()) | head | body;
    Ok(table.map(|captures| Some(Element::new("table").with_children(nodes(captures)).into())))
}

fn row(ctx: &BuildContext<'_>, cell_tag: &'static str) -> Result<Expression, GrammarError> {
    let cell_separator = e(r"[ \t]*\|[ \t]*")?.skip();
    let cell = ctx
        .inline_content()
        .one_or_more()
        .up_to(cell_separator.clone() | e("$")?.skip())
        .map(move |captures| Some(Element::new(cell_tag).with_children(nodes(captures)).into()));

    let row = not(e(&format!("{}$", HEAD_SEPARATOR))?) & cell_separator & cell.one_or_more();
    Ok(row.map(|captures| Some(Element::new("tr").with_children(nodes(captures)).into())))
}
