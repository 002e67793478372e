//! # Logic and Comparison
//!
//! - **Equality**: `=` compares structurally; spans never matter.
//! - **Ordering**: `<`, `>`, `<=`, `>=` on numbers, chained pairwise.
//! - **Logic**: `not`

use crate::ast::{AstNode, NativeFn, Span};
use crate::atoms::helpers::{extract_numbers, validate_arity, validate_arity_range};
use crate::atoms::{Atom, AtomRegistry};
use crate::diagnostics::QuasiError;
use crate::runtime::eval::EvalContext;

/// Returns true if all arguments are equal.
///
/// Usage: (= <a> <b> ...)
///
/// Example:
///   (= '(1 2) (list 1 2)) ; => true
pub const ATOM_EQ: NativeFn = |args, context, _env, span| {
    validate_arity_range(args, 2, None, "=", context, span)?;
    let equal = args.windows(2).all(|pair| pair[0] == pair[1]);
    Ok(AstNode::bool(equal, span))
};

pub const ATOM_LT: NativeFn = |args, context, _env, span| {
    compare(args, "<", |a, b| a < b, context, span)
};

pub const ATOM_GT: NativeFn = |args, context, _env, span| {
    compare(args, ">", |a, b| a > b, context, span)
};

pub const ATOM_LTE: NativeFn = |args, context, _env, span| {
    compare(args, "<=", |a, b| a <= b, context, span)
};

pub const ATOM_GTE: NativeFn = |args, context, _env, span| {
    compare(args, ">=", |a, b| a >= b, context, span)
};

/// Logical negation under the nil/false truthiness rule.
///
/// Usage: (not <x>)
pub const ATOM_NOT: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "not", context, span)?;
    Ok(AstNode::bool(!args[0].value.is_truthy(), span))
};

fn compare(
    args: &[AstNode],
    name: &str,
    holds: fn(f64, f64) -> bool,
    context: &EvalContext,
    span: Span,
) -> Result<AstNode, QuasiError> {
    validate_arity_range(args, 2, None, name, context, span)?;
    let numbers = extract_numbers(args, name, context)?;
    let result = numbers.windows(2).all(|pair| holds(pair[0], pair[1]));
    Ok(AstNode::bool(result, span))
}

pub fn register_logic_atoms(registry: &mut AtomRegistry) {
    registry.register("=", Atom::Primitive(ATOM_EQ));
    registry.register("<", Atom::Primitive(ATOM_LT));
    registry.register(">", Atom::Primitive(ATOM_GT));
    registry.register("<=", Atom::Primitive(ATOM_LTE));
    registry.register(">=", Atom::Primitive(ATOM_GTE));
    registry.register("not", Atom::Primitive(ATOM_NOT));
}
