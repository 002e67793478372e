//! AST module
//!
//! Code and data share one representation: the reader produces [`AstNode`]s,
//! the evaluator consumes and produces them, and macros receive and return
//! them. Nodes are immutable once built; every rewrite (reader macros, macro
//! expansion, quasiquote expansion) builds new nodes around shared children.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use crate::ast::value::{Callable, Lambda, NativeFn};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Byte range of a node in its source text.
///
/// Nodes synthesised at runtime (quasiquote scaffolding, primitive results)
/// carry the span of the form that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both inputs.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A value paired with its source span.
///
/// Equality ignores the span: two nodes are equal when their contents are.
#[derive(Debug, Clone, Serialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Canonical node type. Children are shared, never copied, on rewrite.
pub type AstNode = Spanned<Rc<Expr>>;

/// The shape of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(String),
    /// The only compound form. The head decides whether a non-empty list is
    /// a special form, a macro call, or an ordinary application.
    List(Vec<AstNode>),
    /// An ordinary callable: arguments are evaluated before application.
    #[serde(skip_serializing)]
    Function(Callable),
    /// A callable flagged as a macro at `defmacro` time: it receives its
    /// arguments as raw syntax and its result is expanded again.
    #[serde(skip_serializing)]
    Macro(Callable),
}

/// Parameter list of a lambda: required names plus an optional `...rest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamList {
    pub required: Vec<String>,
    pub rest: Option<String>,
    pub span: Span,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl AstNode {
    pub fn new(expr: Expr, span: Span) -> Self {
        Spanned {
            value: Rc::new(expr),
            span,
        }
    }

    pub fn nil(span: Span) -> Self {
        Self::new(Expr::Nil, span)
    }

    pub fn bool(value: bool, span: Span) -> Self {
        Self::new(Expr::Bool(value), span)
    }

    pub fn number(value: f64, span: Span) -> Self {
        Self::new(Expr::Number(value), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Self::new(Expr::String(value.into()), span)
    }

    pub fn symbol(name: impl Into<String>, span: Span) -> Self {
        Self::new(Expr::Symbol(name.into()), span)
    }

    pub fn list(items: Vec<AstNode>, span: Span) -> Self {
        Self::new(Expr::List(items), span)
    }

    /// Builds `(head arg...)` with `head` as a symbol.
    pub fn form(head: &str, args: impl IntoIterator<Item = AstNode>, span: Span) -> Self {
        let mut items = vec![Self::symbol(head, span)];
        items.extend(args);
        Self::list(items, span)
    }

    /// Same node contents, re-anchored at a different span.
    pub fn respan(&self, span: Span) -> Self {
        Spanned {
            value: Rc::clone(&self.value),
            span,
        }
    }

    /// Re-anchors this node and every list element below it at `span`.
    pub fn respan_all(&self, span: Span) -> Self {
        match &*self.value {
            Expr::List(items) => {
                Self::list(items.iter().map(|item| item.respan_all(span)).collect(), span)
            }
            _ => self.respan(span),
        }
    }
}

// ============================================================================
// INSPECTION
// ============================================================================

impl Expr {
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Nil => "Nil",
            Expr::Bool(_) => "Bool",
            Expr::Number(_) => "Number",
            Expr::String(_) => "String",
            Expr::Symbol(_) => "Symbol",
            Expr::List(_) => "List",
            Expr::Function(_) => "Function",
            Expr::Macro(_) => "Macro",
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Expr::Nil | Expr::Bool(false))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Expr::List(_))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AstNode]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::String(s) => Some(s),
            _ => None,
        }
    }

    /// True when this is a list whose head is the given symbol.
    pub fn is_form(&self, head: &str) -> bool {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(|first| first.value.as_symbol())
            .is_some_and(|s| s == head)
    }

    /// Readable rendering: `read` of the result yields an equal node for
    /// plain data.
    pub fn pretty(&self) -> String {
        self.to_string()
    }

    /// Display rendering: like [`Expr::pretty`] but strings are emitted raw.
    pub fn display_string(&self) -> String {
        match self {
            Expr::String(s) => s.clone(),
            other => other.pretty(),
        }
    }
}

// ============================================================================
// PRINTER
// ============================================================================

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nil => write!(f, "nil"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Number(n) => fmt_number(f, *n),
            Expr::String(s) => fmt_string(f, s),
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                write!(f, ")")
            }
            Expr::Function(callable) => write!(f, "<fn {}>", callable.name()),
            Expr::Macro(callable) => write!(f, "<macro {}>", callable.name()),
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

fn fmt_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for ch in s.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            other => write!(f, "{other}")?,
        }
    }
    write!(f, "\"")
}

pub mod value;
