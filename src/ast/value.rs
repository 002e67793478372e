//! Callable values.
//!
//! A callable is either a native primitive or a user lambda. Whether it acts
//! as an ordinary function or as a macro is decided by the `Expr` variant
//! wrapping it (`Expr::Function` or `Expr::Macro`), never by the callable
//! itself.

use std::fmt;
use std::rc::Rc;

use crate::ast::{AstNode, ParamList, Span};
use crate::diagnostics::SourceArc;
use crate::runtime::env::Env;
use crate::runtime::eval::{EvalContext, EvalResult};

/// Signature shared by primitives and special forms.
///
/// Primitives receive already-evaluated arguments; special forms receive raw
/// syntax. Both get the caller's environment and the span of the call.
pub type NativeFn =
    fn(args: &[AstNode], context: &mut EvalContext, env: &Env, call_span: Span) -> EvalResult;

#[derive(Clone)]
pub enum Callable {
    Native { name: &'static str, func: NativeFn },
    Lambda(Rc<Lambda>),
}

/// A user-defined function closing over its defining environment.
///
/// Body spans are offsets into `source`, the input the `fn` form was read
/// from, which may differ from the input that later calls it.
pub struct Lambda {
    pub params: ParamList,
    pub body: Vec<AstNode>,
    pub env: Env,
    pub span: Span,
    pub source: SourceArc,
}

impl Callable {
    pub fn native(name: &'static str, func: NativeFn) -> Self {
        Callable::Native { name, func }
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Native { name, .. } => name,
            Callable::Lambda(_) => "lambda",
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native { func: a, .. }, Callable::Native { func: b, .. }) => {
                *a as usize == *b as usize
            }
            (Callable::Lambda(a), Callable::Lambda(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native { name, .. } => write!(f, "Native({name})"),
            Callable::Lambda(lambda) => write!(f, "{lambda:?}"),
        }
    }
}

// The captured environment is left out: it usually contains this lambda.
impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
