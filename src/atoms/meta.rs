//! # Meta Primitives
//!
//! Expose the interpreter's own pipeline to programs:
//!
//! - `read`: text to syntax, through the reader (reader macros included)
//! - `eval`: syntax to value, through the expanding entry point
//! - `print`: syntax to text
//! - `defs`: names visible from the caller's scope
//!
//! `(eval (read s))` therefore behaves like evaluating `s` at the call site,
//! except that definitions land in a throwaway child scope.

use crate::ast::{AstNode, NativeFn};
use crate::atoms::helpers::{validate_arity, ExtractValue};
use crate::atoms::{Atom, AtomRegistry};
use crate::diagnostics::to_error_source;
use crate::syntax::parser::parse_one;

/// Source name attached to errors raised while reading program-supplied text.
pub const READ_SOURCE_NAME: &str = "<read>";

/// Parses one form from a string: (read "<text>")
///
/// Empty text and trailing forms are parse errors. The result is anchored at
/// the call, since later errors are reported against the caller's input.
pub const ATOM_READ: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "read", context, span)?;
    let text: &str = args[0].extract("read", context)?;
    let source = to_error_source(READ_SOURCE_NAME, text);
    Ok(parse_one(text, &source)?.respan_all(span))
};

/// Evaluates a syntax value in a child of the caller's scope: (eval <ast>)
///
/// Bindings made by the evaluated code do not escape.
pub const ATOM_EVAL: NativeFn = |args, context, env, span| {
    validate_arity(args, 1, "eval", context, span)?;
    let scope = env.child();
    context.eval(&args[0], &scope)
};

/// Renders a value in readable form: (print <x>) ; => string
pub const ATOM_PRINT: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "print", context, span)?;
    Ok(AstNode::string(args[0].value.pretty(), span))
};

/// Sorted list of every symbol visible at the call site: (defs)
pub const ATOM_DEFS: NativeFn = |args, context, env, span| {
    validate_arity(args, 0, "defs", context, span)?;
    let names = env
        .names()
        .into_iter()
        .map(|name| AstNode::symbol(name, span))
        .collect();
    Ok(AstNode::list(names, span))
};

pub fn register_meta_atoms(registry: &mut AtomRegistry) {
    registry.register("read", Atom::Primitive(ATOM_READ));
    registry.register("eval", Atom::Primitive(ATOM_EVAL));
    registry.register("print", Atom::Primitive(ATOM_PRINT));
    registry.register("defs", Atom::Primitive(ATOM_DEFS));
}
