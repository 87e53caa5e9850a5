//! Expression engine
//!
//! An [`Expression`] is a pure matcher from a [`Cursor`] to either a failure or a
//! list of captures plus the cursor after the match. Expressions are cheap to clone
//! (shared behind an `Arc`) and compose with `&` (sequence) and `|` (ordered choice):
//!
//! ```text
//! let mark = lit("**").skip() & not(lit("*"));
//! let strong = (mark.clone() & everything_up_to(mark)).map(build_strong);
//! ```
//!
//! ## Semantics
//!
//! - Ordered choice commits to the first alternative that succeeds (PEG semantics).
//! - Repetition is greedy and folds all iterations into a single sequence capture.
//! - `up_to` is the lazy counterpart: the terminator is attempted before every
//!   further item, so the shortest match wins.
//! - `map` may reject its captures, which fails the match like any syntax error.
//! - `indented` de-indents the following block of lines by one level and re-runs
//!   an expression on the result.
//! - `memoized` caches results per offset for the duration of one parse. The
//!   registry memoizes every production, which keeps backtracking over nested
//!   markup polynomial.
//!
//! Aggregates and named productions are late-bound: they are looked up in the
//! resolved [`Grammar`] when the expression runs, never when it is built.
//!
//! Every repetition asserts forward progress. A zero-width iteration is a grammar
//! defect and panics instead of looping.

use super::cursor::Cursor;
use super::error::GrammarError;
use super::registry::{Grammar, Namespace};
use super::value::Value;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

/// Transform applied to the captures of a successful match. Returning `None`
/// turns the match into a failure.
pub type Mapper = Arc<dyn Fn(Vec<Value>) -> Option<Value> + Send + Sync>;

/// A successful match: captured values and the cursor after the match.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<'s> {
    pub captures: Vec<Value>,
    pub cursor: Cursor<'s>,
}

impl<'s> Success<'s> {
    pub fn new(captures: Vec<Value>, cursor: Cursor<'s>) -> Self {
        Self { captures, cursor }
    }
}

/// `None` is the failure case; it carries nothing.
pub type MatchResult<'s> = Option<Success<'s>>;

#[derive(Clone)]
pub struct Expression {
    kind: Arc<Kind>,
}

enum Kind {
    Nothing,
    Empty,
    End,
    Literal(String),
    Pattern(Regex),
    Sequence(Vec<Expression>),
    Choice(Vec<Expression>),
    Repeat {
        item: Expression,
        min: usize,
    },
    Optional(Expression),
    Skip(Expression),
    Map(Expression, Mapper),
    SeparatedBy {
        item: Expression,
        separator: Expression,
    },
    UpTo {
        item: Expression,
        terminator: Expression,
        min: usize,
    },
    Scan {
        terminator: Expression,
        min: usize,
    },
    Indented(Expression),
    Not(Expression),
    Group(Expression),
    Aggregate(Namespace),
    Production(usize),
    Memo(Expression),
}

/// State shared by one top-level parse: the grammar in scope and the results of
/// memoized expressions, keyed by node and offset.
struct Scope<'g, 's> {
    grammar: &'g Grammar,
    memo: RefCell<HashMap<(usize, usize), MatchResult<'s>>>,
}

impl<'g> Scope<'g, '_> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            memo: RefCell::new(HashMap::new()),
        }
    }
}

/// Compile a pattern anchored at the cursor. `$` matches at line ends.
pub fn e(pattern: &str) -> Result<Expression, GrammarError> {
    Expression::pattern(pattern)
}

/// Match a fixed string.
pub fn lit(text: &str) -> Expression {
    Expression::literal(text)
}

/// Negative lookahead: succeeds without consuming iff `expression` fails here.
pub fn not(expression: Expression) -> Expression {
    Expression::from_kind(Kind::Not(expression))
}

/// Scan input one character at a time until `terminator` matches. Captures the
/// scanned text (at least one character) followed by the terminator's captures.
pub fn everything_up_to(terminator: Expression) -> Expression {
    Expression::from_kind(Kind::Scan { terminator, min: 1 })
}

impl Expression {
    fn from_kind(kind: Kind) -> Self {
        Self {
            kind: Arc::new(kind),
        }
    }

    /// Never matches.
    pub fn nothing() -> Self {
        Self::from_kind(Kind::Nothing)
    }

    /// Always matches, consuming and capturing nothing.
    pub fn empty() -> Self {
        Self::from_kind(Kind::Empty)
    }

    /// Matches only at the end of input.
    pub fn end() -> Self {
        Self::from_kind(Kind::End)
    }

    pub fn literal(text: &str) -> Self {
        Self::from_kind(Kind::Literal(text.to_string()))
    }

    pub fn pattern(source: &str) -> Result<Self, GrammarError> {
        let regex = RegexBuilder::new(&format!(r"\A(?:{})", source))
            .multi_line(true)
            .build()
            .map_err(|err| GrammarError::InvalidPattern {
                pattern: source.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self::from_kind(Kind::Pattern(regex)))
    }

    /// Ordered choice over `alternatives`; an empty list never matches.
    pub fn choice(alternatives: impl IntoIterator<Item = Expression>) -> Self {
        Self::from_kind(Kind::Choice(alternatives.into_iter().collect()))
    }

    pub fn sequence(items: impl IntoIterator<Item = Expression>) -> Self {
        Self::from_kind(Kind::Sequence(items.into_iter().collect()))
    }

    pub(crate) fn aggregate(namespace: Namespace) -> Self {
        Self::from_kind(Kind::Aggregate(namespace))
    }

    pub(crate) fn production(index: usize) -> Self {
        Self::from_kind(Kind::Production(index))
    }

    /// Sequence: `self` then `next`. Chained sequences stay flat.
    pub fn then(self, next: Expression) -> Self {
        let mut items = if let Kind::Sequence(items) = &*self.kind {
            items.clone()
        } else {
            vec![self.clone()]
        };
        items.push(next);
        Self::from_kind(Kind::Sequence(items))
    }

    /// Ordered choice: `self`, and only if it fails, `alternative`.
    pub fn or(self, alternative: Expression) -> Self {
        let mut alternatives = if let Kind::Choice(alternatives) = &*self.kind {
            alternatives.clone()
        } else {
            vec![self.clone()]
        };
        alternatives.push(alternative);
        Self::from_kind(Kind::Choice(alternatives))
    }

    pub fn zero_or_more(self) -> Self {
        Self::from_kind(Kind::Repeat {
            item: self,
            min: 0,
        })
    }

    pub fn one_or_more(self) -> Self {
        Self::from_kind(Kind::Repeat {
            item: self,
            min: 1,
        })
    }

    /// Always succeeds; captures [`Value::Absent`] when `self` does not match.
    pub fn maybe(self) -> Self {
        Self::from_kind(Kind::Optional(self))
    }

    /// Match for effect only and drop the captures.
    pub fn skip(self) -> Self {
        Self::from_kind(Kind::Skip(self))
    }

    /// Replace the captures with the single value returned by `mapper`, or fail
    /// when it returns `None`.
    pub fn map<F>(self, mapper: F) -> Self
    where
        F: Fn(Vec<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Self::from_kind(Kind::Map(self, Arc::new(mapper)))
    }

    /// Bundle all captures into one sequence capture.
    pub fn group(self) -> Self {
        Self::from_kind(Kind::Group(self))
    }

    /// One or more items separated by `separator`, whose captures are dropped.
    /// Called on a repetition, the repeated item is used.
    pub fn separated_by(self, separator: Expression) -> Self {
        let item = match &*self.kind {
            Kind::Repeat { item, .. } => item.clone(),
            _ => self.clone(),
        };
        Self::from_kind(Kind::SeparatedBy { item, separator })
    }

    /// Non-greedy repetition ending at `terminator`. Called on a repetition, its
    /// minimum count is kept; any other expression may repeat zero times.
    /// Captures the items as one sequence, followed by the terminator's captures.
    pub fn up_to(self, terminator: Expression) -> Self {
        let (item, min) = match &*self.kind {
            Kind::Repeat { item, min } => (item.clone(), *min),
            _ => (self.clone(), 0),
        };
        Self::from_kind(Kind::UpTo {
            item,
            terminator,
            min,
        })
    }

    /// Run `self` over the following block of lines indented one level deeper.
    pub fn indented(self) -> Self {
        Self::from_kind(Kind::Indented(self))
    }

    /// Remember the outcome at each offset for the rest of the parse, so that
    /// backtracking into the same position does not redo the work. Clones share
    /// the table entry.
    pub fn memoized(self) -> Self {
        if let Kind::Memo(_) = &*self.kind {
            return self;
        }
        Self::from_kind(Kind::Memo(self))
    }

    /// Run against `text` with no aggregates in scope, for self-contained
    /// sub-grammars.
    pub fn parse_text<'s>(&self, text: &'s str) -> MatchResult<'s> {
        static EMPTY: Lazy<Grammar> = Lazy::new(Grammar::default);
        self.parse(&EMPTY, Cursor::new(text))
    }

    pub fn parse<'s>(&self, grammar: &Grammar, cursor: Cursor<'s>) -> MatchResult<'s> {
        self.parse_in(&Scope::new(grammar), cursor)
    }

    fn parse_in<'s>(&self, scope: &Scope<'_, 's>, cursor: Cursor<'s>) -> MatchResult<'s> {
        match &*self.kind {
            Kind::Nothing => None,
            Kind::Empty => Some(Success::new(Vec::new(), cursor)),
            Kind::End => cursor
                .is_at_end()
                .then(|| Success::new(Vec::new(), cursor)),
            Kind::Literal(text) => {
                if cursor.rest().starts_with(text.as_str()) {
                    Some(Success::new(
                        vec![Value::Text(text.clone())],
                        cursor.advance(text.len()),
                    ))
                } else {
                    None
                }
            }
            Kind::Pattern(regex) => {
                let found = regex.find(cursor.rest())?;
                Some(Success::new(
                    vec![Value::Text(found.as_str().to_string())],
                    cursor.advance(found.end()),
                ))
            }
            Kind::Sequence(items) => {
                let mut captures = Vec::new();
                let mut current = cursor;
                for item in items {
                    let step = item.parse_in(scope, current)?;
                    captures.extend(step.captures);
                    current = step.cursor;
                }
                Some(Success::new(captures, current))
            }
            Kind::Choice(alternatives) => alternatives
                .iter()
                .find_map(|alternative| alternative.parse_in(scope, cursor)),
            Kind::Repeat { item, min } => {
                let mut captures = Vec::new();
                let mut current = cursor;
                let mut count = 0;
                while let Some(step) = item.parse_in(scope, current) {
                    ensure_progress(current, step.cursor);
                    captures.extend(step.captures);
                    current = step.cursor;
                    count += 1;
                }
                (count >= *min).then(|| Success::new(vec![Value::List(captures)], current))
            }
            Kind::Optional(inner) => Some(
                inner
                    .parse_in(scope, cursor)
                    .unwrap_or_else(|| Success::new(vec![Value::Absent], cursor)),
            ),
            Kind::Skip(inner) => inner
                .parse_in(scope, cursor)
                .map(|step| Success::new(Vec::new(), step.cursor)),
            Kind::Map(inner, mapper) => {
                let step = inner.parse_in(scope, cursor)?;
                let value = mapper(step.captures)?;
                Some(Success::new(vec![value], step.cursor))
            }
            Kind::SeparatedBy { item, separator } => {
                let first = item.parse_in(scope, cursor)?;
                let mut captures = first.captures;
                let mut current = first.cursor;
                while let Some(next) = separator
                    .parse_in(scope, current)
                    .and_then(|sep| item.parse_in(scope, sep.cursor))
                {
                    ensure_progress(current, next.cursor);
                    captures.extend(next.captures);
                    current = next.cursor;
                }
                Some(Success::new(vec![Value::List(captures)], current))
            }
            Kind::UpTo {
                item,
                terminator,
                min,
            } => {
                let mut captures = Vec::new();
                let mut current = cursor;
                let mut count = 0;
                loop {
                    if count >= *min {
                        if let Some(end) = terminator.parse_in(scope, current) {
                            let mut all = vec![Value::List(captures)];
                            all.extend(end.captures);
                            return Some(Success::new(all, end.cursor));
                        }
                    }
                    let step = item.parse_in(scope, current)?;
                    ensure_progress(current, step.cursor);
                    captures.extend(step.captures);
                    current = step.cursor;
                    count += 1;
                }
            }
            Kind::Scan { terminator, min } => {
                let mut current = cursor;
                let mut count = 0;
                loop {
                    if count >= *min {
                        if let Some(end) = terminator.parse_in(scope, current) {
                            let mut all = vec![Value::Text(cursor.slice_to(&current).to_string())];
                            all.extend(end.captures);
                            return Some(Success::new(all, end.cursor));
                        }
                    }
                    let next = current.next_char()?;
                    current = current.advance(next.len_utf8());
                    count += 1;
                }
            }
            Kind::Indented(inner) => {
                let block = IndentedBlock::take(cursor.rest())?;
                // The block is a fresh string; offsets into it mean nothing to the
                // outer memo table.
                let nested = inner.parse(scope.grammar, Cursor::new(&block.text))?;
                if !nested.cursor.rest().trim().is_empty() {
                    return None;
                }
                Some(Success::new(nested.captures, cursor.advance(block.width)))
            }
            Kind::Not(inner) => match inner.parse_in(scope, cursor) {
                Some(_) => None,
                None => Some(Success::new(Vec::new(), cursor)),
            },
            Kind::Group(inner) => inner
                .parse_in(scope, cursor)
                .map(|step| Success::new(vec![Value::List(step.captures)], step.cursor)),
            Kind::Aggregate(namespace) => {
                scope.grammar.aggregate(*namespace).parse_in(scope, cursor)
            }
            Kind::Production(index) => scope.grammar.production(*index).parse_in(scope, cursor),
            Kind::Memo(inner) => {
                let key = (Arc::as_ptr(&self.kind) as usize, cursor.offset());
                let hit = scope.memo.borrow().get(&key).cloned();
                if let Some(result) = hit {
                    return result;
                }
                let result = inner.parse_in(scope, cursor);
                scope.memo.borrow_mut().insert(key, result.clone());
                result
            }
        }
    }
}

fn ensure_progress(before: Cursor<'_>, after: Cursor<'_>) {
    if after <= before {
        panic!(
            "zero-width iteration inside a repetition at offset {}",
            before.offset()
        );
    }
}

/// The lines following the cursor that share the first line's indentation, with
/// that indentation removed. Blank lines inside the block are kept; the block
/// ends before the first non-blank line that is not indented as deeply.
struct IndentedBlock {
    /// Bytes of the original input covered, up to the end of the last non-blank line.
    width: usize,
    text: String,
}

impl IndentedBlock {
    fn take(rest: &str) -> Option<Self> {
        let first = rest.split('\n').next()?;
        let body = first.trim_start_matches(|c| c == ' ' || c == '\t');
        let indent = &first[..first.len() - body.len()];
        if indent.is_empty() || body.trim().is_empty() {
            return None;
        }

        let mut lines: Vec<&str> = Vec::new();
        let mut pending_blank = 0;
        let mut offset = 0;
        let mut width = 0;
        for line in rest.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            if content.trim().is_empty() {
                pending_blank += 1;
            } else if let Some(stripped) = content.strip_prefix(indent) {
                lines.extend(std::iter::repeat("").take(pending_blank));
                pending_blank = 0;
                lines.push(stripped);
                width = offset + content.len();
            } else {
                break;
            }
            offset += line.len();
        }

        Some(Self {
            width,
            text: lines.join("\n"),
        })
    }
}

impl BitAnd for Expression {
    type Output = Expression;

    fn bitand(self, rhs: Expression) -> Expression {
        self.then(rhs)
    }
}

impl BitOr for Expression {
    type Output = Expression;

    fn bitor(self, rhs: Expression) -> Expression {
        self.or(rhs)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            Kind::Nothing => write!(f, "Nothing"),
            Kind::Empty => write!(f, "Empty"),
            Kind::End => write!(f, "End"),
            Kind::Literal(text) => write!(f, "{:?}", text),
            Kind::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Kind::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Kind::Choice(items) => f.debug_tuple("Choice").field(items).finish(),
            Kind::Repeat { item, min } => f
                .debug_struct("Repeat")
                .field("item", item)
                .field("min", min)
                .finish(),
            Kind::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Kind::Skip(inner) => f.debug_tuple("Skip").field(inner).finish(),
            Kind::Map(inner, _) => f.debug_tuple("Map").field(inner).finish(),
            Kind::SeparatedBy { item, separator } => f
                .debug_struct("SeparatedBy")
                .field("item", item)
                .field("separator", separator)
                .finish(),
            Kind::UpTo {
                item,
                terminator,
                min,
            } => f
                .debug_struct("UpTo")
                .field("item", item)
                .field("terminator", terminator)
                .field("min", min)
                .finish(),
            Kind::Scan { terminator, min } => f
                .debug_struct("Scan")
                .field("terminator", terminator)
                .field("min", min)
                .finish(),
            Kind::Indented(inner) => f.debug_tuple("Indented").field(inner).finish(),
            Kind::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Kind::Group(inner) => f.debug_tuple("Group").field(inner).finish(),
            Kind::Aggregate(namespace) => write!(f, "{:?}Content", namespace),
            Kind::Production(index) => write!(f, "Production({})", index),
            Kind::Memo(inner) => fmt::Debug::fmt(inner, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texier::ast::Element;

    fn run(expression: &Expression, input: &str) -> Option<(Vec<Value>, usize)> {
        let grammar = Grammar::default();
        expression
            .parse(&grammar, Cursor::new(input))
            .map(|success| (success.captures, success.cursor.offset()))
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn pattern(source: &str) -> Expression {
        e(source).expect("valid test pattern")
    }

    #[test]
    fn test_literal_and_pattern_atoms() {
        assert_eq!(run(&lit("ab"), "abc"), Some((vec![text("ab")], 2)));
        assert_eq!(run(&lit("ab"), "xab"), None);
        assert_eq!(run(&pattern(r"\d+"), "42x"), Some((vec![text("42")], 2)));
        // anchored at the cursor, not searched for
        assert_eq!(run(&pattern(r"\d+"), "x42"), None);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = e("(unclosed").unwrap_err();
        assert!(matches!(err, GrammarError::InvalidPattern { .. }));
    }

    #[test]
    fn test_sequence_concatenates_captures() {
        let expression = lit("a") & lit("b").skip() & lit("c");
        assert_eq!(run(&expression, "abc"), Some((vec![text("a"), text("c")], 3)));
        assert_eq!(run(&expression, "abx"), None);
    }

    #[test]
    fn test_ordered_choice_commits_to_first_success() {
        let expression = lit("**") | lit("*");
        assert_eq!(run(&expression, "**x"), Some((vec![text("**")], 2)));

        // registration order is the tie-break
        let reversed = lit("*") | lit("**");
        assert_eq!(run(&reversed, "**x"), Some((vec![text("*")], 1)));
    }

    #[test]
    fn test_choice_retries_from_original_cursor() {
        let expression = (lit("a") & lit("x")) | (lit("a") & lit("b"));
        assert_eq!(run(&expression, "ab"), Some((vec![text("a"), text("b")], 2)));
    }

    #[test]
    fn test_repetition_is_greedy_and_folds_captures() {
        let expression = lit("a").zero_or_more();
        assert_eq!(
            run(&expression, "aab"),
            Some((vec![Value::List(vec![text("a"), text("a")])], 2))
        );
        assert_eq!(run(&expression, "b"), Some((vec![Value::List(vec![])], 0)));
        assert_eq!(run(&lit("a").one_or_more(), "b"), None);
    }

    #[test]
    #[should_panic(expected = "zero-width iteration")]
    fn test_zero_width_repetition_panics() {
        let expression = pattern("a*").zero_or_more();
        run(&expression, "bbb");
    }

    #[test]
    #[should_panic(expected = "zero-width iteration")]
    fn test_zero_width_up_to_item_panics() {
        let expression = lit("x").maybe().up_to(lit("!"));
        run(&expression, "abc");
    }

    #[test]
    fn test_optional_produces_absent() {
        let expression = lit("a").maybe() & lit("b");
        assert_eq!(run(&expression, "b"), Some((vec![Value::Absent, text("b")], 1)));
    }

    #[test]
    fn test_map_can_reject() {
        let digits = pattern(r"\d+").map(|mut captures| {
            let number: u32 = captures.pop()?.into_text()?.parse().ok()?;
            (number < 100).then(|| Value::Text(number.to_string()))
        });
        let fallback = digits | pattern(r"\d+").map(|_| Some(text("big")));

        assert_eq!(run(&fallback, "42"), Some((vec![text("42")], 2)));
        assert_eq!(run(&fallback, "420"), Some((vec![text("big")], 3)));
    }

    #[test]
    fn test_separated_by() {
        let expression = pattern(r"\w+").separated_by(pattern(r" *, *"));
        assert_eq!(
            run(&expression, "a, b,c;"),
            Some((vec![Value::List(vec![text("a"), text("b"), text("c")])], 6))
        );
        // a single item needs no separator; a trailing one is left unconsumed
        assert_eq!(
            run(&expression, "a, "),
            Some((vec![Value::List(vec![text("a")])], 1))
        );
    }

    #[test]
    fn test_up_to_is_non_greedy() {
        let any = pattern(r"(?s).");
        let expression = lit("`").skip() & any.zero_or_more().up_to(lit("`").skip());

        let (captures, end) = run(&expression, "`a < b` and `c`").expect("matches");
        assert_eq!(end, 7);
        assert_eq!(Value::List(captures).into_text().as_deref(), Some("a < b"));
    }

    #[test]
    fn test_up_to_respects_minimum() {
        let expression = pattern("[^|]").one_or_more().up_to(lit("|"));
        assert_eq!(run(&expression, "|x|"), None);
        assert_eq!(
            run(&expression, "x|"),
            Some((vec![Value::List(vec![text("x")]), text("|")], 2))
        );
    }

    #[test]
    fn test_up_to_fails_without_terminator() {
        let expression = pattern(".").zero_or_more().up_to(lit("!"));
        assert_eq!(run(&expression, "no bang here"), None);
    }

    #[test]
    fn test_everything_up_to_captures_one_string() {
        let expression = everything_up_to(lit("''").skip());
        assert_eq!(run(&expression, "*x*''"), Some((vec![text("*x*")], 5)));
        assert_eq!(run(&expression, "''"), None);
    }

    #[test]
    fn test_negative_lookahead() {
        let single_star = lit("*") & not(lit("*"));
        assert_eq!(run(&single_star, "*x"), Some((vec![text("*")], 1)));
        assert_eq!(run(&single_star, "**x"), None);
    }

    #[test]
    fn test_group_bundles_captures() {
        let expression = (lit("a") & lit("b")).group();
        assert_eq!(
            run(&expression, "ab"),
            Some((vec![Value::List(vec![text("a"), text("b")])], 2))
        );
    }

    #[test]
    fn test_indented_strips_one_level() {
        let line = pattern(r"[^\n]+");
        let expression = line.separated_by(pattern(r"\n+")).indented();

        let input = "  first\n    deeper\n\n  third\nback";
        let (captures, end) = run(&expression, input).expect("matches");
        assert_eq!(
            captures,
            vec![Value::List(vec![text("first"), text("  deeper"), text("third")])]
        );
        assert_eq!(&input[end..], "\nback");
    }

    #[test]
    fn test_indented_requires_indentation() {
        let expression = pattern(r"[^\n]+").indented();
        assert_eq!(run(&expression, "flush\n  more"), None);
    }

    #[test]
    fn test_indented_fails_when_content_left_over() {
        let expression = lit("a").indented();
        assert_eq!(run(&expression, "  a\n  b"), None);
    }

    #[test]
    fn test_transform_builds_elements() {
        let expression = (lit("*").skip() & everything_up_to(lit("*").skip())).map(|mut c| {
            let content = c.pop()?.into_text()?;
            Some(Element::new("em").with_text(content).into())
        });
        let (captures, _) = run(&expression, "*hi*").expect("matches");
        assert!(matches!(&captures[0], Value::Element(el) if el.tag == "em"));
    }

    #[test]
    fn test_memoized_runs_once_per_offset() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let word = pattern("[a-z]+")
            .map(move |mut c| {
                counter.fetch_add(1, Ordering::SeqCst);
                c.pop()
            })
            .memoized();
        let expression = (word.clone() & lit("!")) | (word.clone() & lit("?")) | word;

        assert_eq!(run(&expression, "abc?"), Some((vec![text("abc"), text("?")], 4)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Each parse starts with an empty table.
        assert!(run(&expression, "abc").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_memoized_remembers_failure() {
        let expression = (pattern("a+").memoized() & lit("b")) | lit("a");
        assert_eq!(run(&expression, "aac"), Some((vec![text("a")], 1)));
        assert_eq!(format!("{:?}", pattern("a").memoized().memoized()), "/\\A(?:a)/");
    }
}
