//! Parsing engine
//!
//! The engine is a small parsing-expression library plus a registry that composes
//! the grammar at runtime:
//! 1. **Cursor**: immutable view over the remaining input
//! 2. **Expression**: composable matchers (sequence, ordered choice, repetition,
//!    non-greedy scanning, indentation-scoped sub-parses, lookahead, transforms)
//! 3. **Registry**: named productions contributed by syntax modules, grouped in a
//!    block and an inline namespace, resolved once into the two aggregate
//!    nonterminals `BlockContent` and `InlineContent`
//!
//! ## Terminology
//!
//! - **match failure**: an ordinary `None` from an expression, resolved by backtracking
//! - **production**: one named, switchable rule of a syntax module
//! - **aggregate**: the ordered choice of all enabled productions of a namespace
//!
//! Failure carries no payload. Alternatives are explored constantly during normal
//! operation and a dead end must stay cheap.

pub mod cursor;
pub mod error;
pub mod expression;
pub mod registry;
pub mod value;

pub use cursor::Cursor;
pub use error::GrammarError;
pub use expression::{e, everything_up_to, lit, not, Expression, MatchResult, Success};
pub use registry::{BuildContext, Grammar, Namespace, Production, Registry};
pub use value::{nodes, take_modifier, Value};
