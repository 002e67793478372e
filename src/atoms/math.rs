//! # Mathematical Operations
//!
//! Arithmetic primitives. All of them are pure and work on `Expr::Number`
//! (f64).
//!
//! ## Atoms Provided
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `mod`

use crate::ast::{AstNode, NativeFn};
use crate::atoms::helpers::{extract_numbers, validate_arity, validate_arity_range};
use crate::atoms::{Atom, AtomRegistry};
use crate::diagnostics::ErrorReporting;

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///
/// Example:
///   (+ 1 2 3) ; => 6
///   (+)       ; => 0
pub const ATOM_ADD: NativeFn = |args, context, _env, span| {
    let numbers = extract_numbers(args, "+", context)?;
    Ok(AstNode::number(numbers.iter().sum(), span))
};

/// Subtracts, or negates a single argument.
///
/// Usage: (- <a> <b> ...)
///
/// Example:
///   (- 5 2) ; => 3
///   (- 4)   ; => -4
pub const ATOM_SUB: NativeFn = |args, context, _env, span| {
    validate_arity_range(args, 1, None, "-", context, span)?;
    let numbers = extract_numbers(args, "-", context)?;
    let result = match numbers.as_slice() {
        [only] => -only,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, n| acc - n),
        [] => 0.0,
    };
    Ok(AstNode::number(result, span))
};

/// Multiplies numbers.
///
/// Usage: (* <a> <b> ...)
///
/// Example:
///   (* 2 3 4) ; => 24
pub const ATOM_MUL: NativeFn = |args, context, _env, span| {
    let numbers = extract_numbers(args, "*", context)?;
    Ok(AstNode::number(numbers.iter().product(), span))
};

/// Divides left to right, or takes the reciprocal of a single argument.
///
/// Usage: (/ <a> <b> ...)
///
/// Example:
///   (/ 6 2) ; => 3
///
/// Note: Errors on division by zero.
pub const ATOM_DIV: NativeFn = |args, context, _env, span| {
    validate_arity_range(args, 1, None, "/", context, span)?;
    let numbers = extract_numbers(args, "/", context)?;
    let (mut result, divisors) = match numbers.as_slice() {
        [_] => (1.0, &numbers[..1]),
        [first, ..] => (*first, &numbers[1..]),
        [] => (0.0, &numbers[..0]),
    };
    for (offset, divisor) in divisors.iter().enumerate() {
        if *divisor == 0.0 {
            let index = if numbers.len() == 1 { 0 } else { offset + 1 };
            return Err(context.eval_failure("division by zero", args[index].span));
        }
        result /= divisor;
    }
    Ok(AstNode::number(result, span))
};

/// Remainder of two numbers.
///
/// Usage: (mod <a> <b>)
///
/// Example:
///   (mod 5 2) ; => 1
pub const ATOM_MOD: NativeFn = |args, context, _env, span| {
    validate_arity(args, 2, "mod", context, span)?;
    let numbers = extract_numbers(args, "mod", context)?;
    if numbers[1] == 0.0 {
        return Err(context.eval_failure("modulo by zero", args[1].span));
    }
    Ok(AstNode::number(numbers[0] % numbers[1], span))
};

pub fn register_math_atoms(registry: &mut AtomRegistry) {
    registry.register("+", Atom::Primitive(ATOM_ADD));
    registry.register("-", Atom::Primitive(ATOM_SUB));
    registry.register("*", Atom::Primitive(ATOM_MUL));
    registry.register("/", Atom::Primitive(ATOM_DIV));
    registry.register("mod", Atom::Primitive(ATOM_MOD));
}
