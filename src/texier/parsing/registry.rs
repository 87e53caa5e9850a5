//! Grammar registry
//!
//! Syntax modules register named productions into the block or inline namespace.
//! A production carries a build function instead of a finished expression, since
//! its body usually refers to the `BlockContent` or `InlineContent` aggregate and
//! those are not known until every module has registered.
//!
//! The first call to [`Registry::grammar`] resolves everything at once: each
//! enabled production is built, the aggregates are assembled in registration
//! order and the result is cached for the lifetime of the registry. References to
//! the aggregates inside production bodies stay symbolic and are looked up in the
//! cached [`Grammar`] while matching, so mutual recursion never recurses at build
//! time.
//!
//! After resolution the registry is frozen. Enabling, disabling, registering and
//! option changes are rejected with [`GrammarError::Frozen`].

use super::cursor::Cursor;
use super::error::GrammarError;
use super::expression::{e, Expression, MatchResult};
use crate::texier::validation::{Dtd, Policy};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Runs of non-blank lines, taken verbatim when nothing else matches a block.
const BLOCK_FALLBACK: &str = r"[^\n]*\S[^\n]*(?:\n[^\n]*\S[^\n]*)*";

/// A single character, taken verbatim when nothing else matches inline.
const INLINE_FALLBACK: &str = r"[^\n]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Block,
    Inline,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Namespace::Block => "block",
            Namespace::Inline => "inline",
        })
    }
}

pub type BuildFn =
    Box<dyn Fn(&BuildContext<'_>) -> Result<Expression, GrammarError> + Send + Sync>;

/// One named, switchable grammar rule.
pub struct Production {
    name: String,
    namespace: Namespace,
    enabled: bool,
    build: BuildFn,
}

impl Production {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// What a build function can see while its production is being resolved.
pub struct BuildContext<'r> {
    registry: &'r Registry,
}

impl BuildContext<'_> {
    /// Late-bound reference to the block aggregate.
    pub fn block_content(&self) -> Expression {
        Expression::aggregate(Namespace::Block)
    }

    /// Late-bound reference to the inline aggregate.
    pub fn inline_content(&self) -> Expression {
        Expression::aggregate(Namespace::Inline)
    }

    /// Late-bound reference to a single production. A disabled production
    /// never matches.
    pub fn production(&self, namespace: Namespace, name: &str) -> Result<Expression, GrammarError> {
        self.registry
            .index_of(namespace, name)
            .map(Expression::production)
            .ok_or_else(|| GrammarError::UnknownProduction(name.to_string()))
    }

    pub fn option<T: DeserializeOwned>(&self, key: &str) -> Result<T, GrammarError> {
        self.registry.option(key)
    }

    pub fn policy(&self) -> Arc<dyn Policy> {
        Arc::clone(&self.registry.policy)
    }

    pub fn dtd(&self) -> &'static Dtd {
        self.registry.dtd
    }
}

pub struct Registry {
    productions: Vec<Production>,
    options: BTreeMap<String, serde_json::Value>,
    policy: Arc<dyn Policy>,
    dtd: &'static Dtd,
    grammar: OnceCell<Grammar>,
}

impl Registry {
    pub fn new(policy: Arc<dyn Policy>) -> Self {
        Self {
            productions: Vec::new(),
            options: BTreeMap::new(),
            policy,
            dtd: Dtd::html(),
            grammar: OnceCell::new(),
        }
    }

    pub fn register<F>(&mut self, namespace: Namespace, name: &str, build: F) -> Result<(), GrammarError>
    where
        F: Fn(&BuildContext<'_>) -> Result<Expression, GrammarError> + Send + Sync + 'static,
    {
        self.ensure_open()?;
        if self.index_of(namespace, name).is_some() {
            return Err(GrammarError::DuplicateProduction {
                namespace,
                name: name.to_string(),
            });
        }
        self.productions.push(Production {
            name: name.to_string(),
            namespace,
            enabled: true,
            build: Box::new(build),
        });
        Ok(())
    }

    /// Switch every production called `name`, in either namespace.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), GrammarError> {
        self.ensure_open()?;
        let mut found = false;
        for production in self.productions.iter_mut().filter(|p| p.name == name) {
            production.enabled = enabled;
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(GrammarError::UnknownProduction(name.to_string()))
        }
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        let mut matching = self.productions.iter().filter(|p| p.name == name).peekable();
        matching.peek()?;
        Some(matching.any(|p| p.enabled))
    }

    pub fn set_option<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), GrammarError> {
        self.ensure_open()?;
        let value = serde_json::to_value(value).map_err(|err| GrammarError::InvalidOption {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.options.insert(key.to_string(), value);
        Ok(())
    }

    pub fn option<T: DeserializeOwned>(&self, key: &str) -> Result<T, GrammarError> {
        let value = self
            .options
            .get(key)
            .ok_or_else(|| GrammarError::MissingOption(key.to_string()))?;
        T::deserialize(value).map_err(|err| GrammarError::InvalidOption {
            key: key.to_string(),
            message: err.to_string(),
        })
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn policy(&self) -> &Arc<dyn Policy> {
        &self.policy
    }

    pub fn is_resolved(&self) -> bool {
        self.grammar.get().is_some()
    }

    /// The resolved grammar, building it on first use.
    pub fn grammar(&self) -> Result<&Grammar, GrammarError> {
        self.grammar.get_or_try_init(|| self.resolve())
    }

    /// The block aggregate. Resolves the grammar if needed.
    pub fn block_content(&self) -> Result<Expression, GrammarError> {
        self.grammar()?;
        Ok(Expression::aggregate(Namespace::Block))
    }

    /// The inline aggregate. Resolves the grammar if needed.
    pub fn inline_content(&self) -> Result<Expression, GrammarError> {
        self.grammar()?;
        Ok(Expression::aggregate(Namespace::Inline))
    }

    fn ensure_open(&self) -> Result<(), GrammarError> {
        if self.is_resolved() {
            Err(GrammarError::Frozen)
        } else {
            Ok(())
        }
    }

    fn index_of(&self, namespace: Namespace, name: &str) -> Option<usize> {
        self.productions
            .iter()
            .position(|p| p.namespace == namespace && p.name == name)
    }

    fn resolve(&self) -> Result<Grammar, GrammarError> {
        let context = BuildContext { registry: self };
        let mut built = Vec::with_capacity(self.productions.len());
        for production in &self.productions {
            let expression = if production.enabled {
                trace!(
                    production = %production.name,
                    namespace = %production.namespace,
                    "building production"
                );
                (production.build)(&context)?.memoized()
            } else {
                Expression::nothing()
            };
            built.push(expression);
        }

        let block = self.assemble(&built, Namespace::Block, e(BLOCK_FALLBACK)?);
        let inline = self.assemble(&built, Namespace::Inline, e(INLINE_FALLBACK)?);
        let whitespace = e(r"\s*")?.skip();
        let document = (whitespace.clone() & Expression::aggregate(Namespace::Block))
            .zero_or_more()
            & whitespace
            & Expression::end();

        debug!(
            productions = self.productions.len(),
            enabled = self.productions.iter().filter(|p| p.enabled).count(),
            "grammar resolved"
        );

        Ok(Grammar {
            productions: built,
            block,
            inline,
            document,
            nothing: Expression::nothing(),
        })
    }

    fn assemble(&self, built: &[Expression], namespace: Namespace, fallback: Expression) -> Expression {
        Expression::choice(
            self.productions
                .iter()
                .zip(built)
                .filter(|(production, _)| production.enabled && production.namespace == namespace)
                .map(|(_, expression)| expression.clone())
                .chain(std::iter::once(fallback)),
        )
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("productions", &self.productions)
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// The resolved, read-only grammar of one registry.
pub struct Grammar {
    productions: Vec<Expression>,
    block: Expression,
    inline: Expression,
    document: Expression,
    nothing: Expression,
}

impl Grammar {
    pub(crate) fn aggregate(&self, namespace: Namespace) -> &Expression {
        match namespace {
            Namespace::Block => &self.block,
            Namespace::Inline => &self.inline,
        }
    }

    pub(crate) fn production(&self, index: usize) -> &Expression {
        self.productions.get(index).unwrap_or(&self.nothing)
    }

    /// Blocks separated by whitespace, through to the end of input.
    pub fn document(&self) -> &Expression {
        &self.document
    }

    pub fn parse_document<'s>(&self, text: &'s str) -> MatchResult<'s> {
        self.document.parse(self, Cursor::new(text))
    }

    /// Run `expression` against `text` with this grammar's aggregates in scope.
    pub fn parse<'s>(&self, expression: &Expression, text: &'s str) -> MatchResult<'s> {
        expression.parse(self, Cursor::new(text))
    }
}

/// An empty grammar: no productions, and aggregates that never match.
impl Default for Grammar {
    fn default() -> Self {
        Self {
            productions: Vec::new(),
            block: Expression::nothing(),
            inline: Expression::nothing(),
            document: Expression::nothing(),
            nothing: Expression::nothing(),
        }
    }
}
