//! The intermediate representation a query string compiles to.
//!
//! The IR is a tree of tagged variants in three disjoint families, mirroring
//! the partition already present in the grammar: segments and selectors
//! (node streams to node streams), the logical sub-language of filter
//! predicates (node to bool), and singular queries (node to at most one
//! value). Function extensions are split by declared return type, so an
//! ill-typed expression — a logical function compared for order, a value
//! function used as an existence test — cannot be represented at all; the
//! parser rejects it instead.
//!
//! An IR is built once by the parser and never mutated. Compiled regexes
//! live inside their function node and are safe to share across threads.

use regex::Regex;
use serde_json::Value;

/// A complete absolute query: `$` followed by segments.
#[derive(Debug, Clone)]
pub struct Query {
    pub segments: Vec<Segment>,
}

/// One step of a query, applying its selectors either to each input node or
/// to every descendant of each input node.
#[derive(Debug, Clone)]
pub enum Segment {
    /// `.name`, `.*`, or a bracketed selector list.
    Child(Vec<Selector>),
    /// `..name`, `..*`, or `..[...]`.
    Descendant(Vec<Selector>),
}

impl Segment {
    /// The selectors this segment applies, in declaration order.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        match self {
            Segment::Child(selectors) | Segment::Descendant(selectors) => selectors,
        }
    }
}

/// Maps one node to a list of result nodes.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Object member by key.
    Name(String),
    /// Every element of an array or every member value of an object.
    Wildcard,
    /// Array element by position; negative counts from the end.
    Index(i64),
    /// Array slice with optional bounds and a step.
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: i64,
    },
    /// Children of the node that satisfy a predicate.
    Filter(LogicalExpr),
}

/// Disjunction of conjunctions: `a && b || c`.
#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub terms: Vec<AndExpr>,
}

/// Conjunction of basic expressions.
#[derive(Debug, Clone)]
pub struct AndExpr {
    pub terms: Vec<BasicExpr>,
}

#[derive(Debug, Clone)]
pub enum BasicExpr {
    /// `(expr)` or `!(expr)`.
    Paren { negated: bool, expr: LogicalExpr },
    /// `left op right` over singleton values.
    Comparison {
        left: Comparable,
        op: ComparisonOp,
        right: Comparable,
    },
    /// Existence test of a sub-query, or a logical function call.
    Test { negated: bool, test: TestExpr },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// An operand of a comparison. Evaluates to a single value or to Nothing.
#[derive(Debug, Clone)]
pub enum Comparable {
    Literal(Value),
    Singular(SingularQuery),
    Function(ValueFunction),
}

/// The operand of an existence test.
#[derive(Debug, Clone)]
pub enum TestExpr {
    Query(FilterQuery),
    Function(LogicalFunction),
}

/// Where an embedded query starts walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `$`: the document root.
    Root,
    /// `@`: the node the filter is currently examining.
    Current,
}

/// A query embedded in a filter, anchored at `@` or `$`, with the full
/// segment grammar available.
#[derive(Debug, Clone)]
pub struct FilterQuery {
    pub anchor: Anchor,
    pub segments: Vec<Segment>,
}

impl FilterQuery {
    /// Reinterpret as a singular query, if every segment is a single name
    /// or index selection. This is the shape the grammar guarantees to
    /// produce at most one node.
    #[must_use]
    pub fn to_singular(&self) -> Option<SingularQuery> {
        let mut steps = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let Segment::Child(selectors) = segment else {
                return None;
            };
            let [selector] = selectors.as_slice() else {
                return None;
            };
            match selector {
                Selector::Name(name) => steps.push(SingularStep::Name(name.clone())),
                Selector::Index(index) => steps.push(SingularStep::Index(*index)),
                _ => return None,
            }
        }
        Some(SingularQuery {
            anchor: self.anchor,
            steps,
        })
    }
}

/// A query guaranteed by syntax to produce at most one node: only member
/// and index steps, no wildcards, slices, or filters.
#[derive(Debug, Clone)]
pub struct SingularQuery {
    pub anchor: Anchor,
    pub steps: Vec<SingularStep>,
}

#[derive(Debug, Clone)]
pub enum SingularStep {
    Name(String),
    Index(i64),
}

/// Function extensions whose declared return type is a value (or Nothing).
/// These may appear as comparison operands and as `ValueType` arguments.
#[derive(Debug, Clone)]
pub enum ValueFunction {
    /// `length(v)`: Unicode scalar count of a string, element count of an
    /// array, member count of an object; Nothing otherwise.
    Length(ValueArg),
    /// `count(nodes)`: size of a nodelist.
    Count(FilterQuery),
    /// `value(nodes)`: the value of a one-node nodelist; Nothing otherwise.
    Value(FilterQuery),
}

/// Function extensions whose declared return type is logical. These may
/// appear only in test position.
#[derive(Debug, Clone)]
pub enum LogicalFunction {
    /// `match(v, pattern)`: the whole string matches. The pattern is
    /// compiled — fully anchored — at parse time.
    Match { input: ValueArg, regex: Regex },
    /// `search(v, pattern)`: some substring matches.
    Search { input: ValueArg, regex: Regex },
}

impl ValueFunction {
    /// The function's name in query syntax.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ValueFunction::Length(_) => crate::grammar::FUNC_LENGTH,
            ValueFunction::Count(_) => crate::grammar::FUNC_COUNT,
            ValueFunction::Value(_) => crate::grammar::FUNC_VALUE,
        }
    }
}

impl LogicalFunction {
    /// The function's name in query syntax.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LogicalFunction::Match { .. } => crate::grammar::FUNC_MATCH,
            LogicalFunction::Search { .. } => crate::grammar::FUNC_SEARCH,
        }
    }
}

/// A `ValueType` argument: a literal, a singular query, or a nested
/// value-returning function.
#[derive(Debug, Clone)]
pub enum ValueArg {
    Literal(Value),
    Singular(SingularQuery),
    Function(Box<ValueFunction>),
}
