//! Collection operations.
//!
//! Lists are immutable vectors of nodes; every operation here builds a new
//! list that shares the original children. `cons` is the constructor the
//! quasiquote rewrite targets, so its contract is fixed: prepend one item to
//! a list.

use crate::ast::{AstNode, Expr, NativeFn};
use crate::atoms::helpers::{type_error, validate_arity, ExtractValue};
use crate::atoms::{Atom, AtomRegistry};

// ============================================================================
// LIST CONSTRUCTION
// ============================================================================

/// Prepends an item to a list: (cons <item> <list>)
///
/// `nil` is accepted as the empty list.
pub const ATOM_CONS: NativeFn = |args, context, _env, span| {
    validate_arity(args, 2, "cons", context, span)?;
    let tail: &[AstNode] = match &*args[1].value {
        Expr::List(items) => items,
        Expr::Nil => &[],
        _ => return Err(type_error(&args[1], "cons", "List", context)),
    };

    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(AstNode::list(items, span))
};

/// Constructs a list from arguments: (list <a> <b> ...)
pub const ATOM_LIST: NativeFn = |args, _context, _env, span| Ok(AstNode::list(args.to_vec(), span));

// ============================================================================
// LIST ACCESS
// ============================================================================

/// First element, or `nil` for the empty list: (first <list>)
pub const ATOM_FIRST: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "first", context, span)?;
    let items: &[AstNode] = args[0].extract("first", context)?;
    Ok(items.first().cloned().unwrap_or_else(|| AstNode::nil(span)))
};

/// Everything after the first element; `()` for the empty list: (rest <list>)
pub const ATOM_REST: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "rest", context, span)?;
    let items: &[AstNode] = args[0].extract("rest", context)?;
    let tail = items.get(1..).map(<[AstNode]>::to_vec).unwrap_or_default();
    Ok(AstNode::list(tail, span))
};

/// Length of a list or string: (count <collection>)
pub const ATOM_COUNT: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "count", context, span)?;
    let count = match &*args[0].value {
        Expr::List(items) => items.len(),
        Expr::String(s) => s.chars().count(),
        Expr::Nil => 0,
        _ => return Err(type_error(&args[0], "count", "List or String", context)),
    };
    Ok(AstNode::number(count as f64, span))
};

// ============================================================================
// PREDICATES
// ============================================================================

/// True for `()`, `nil` and `""`: (empty? <collection>)
pub const ATOM_EMPTY: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "empty?", context, span)?;
    let empty = match &*args[0].value {
        Expr::List(items) => items.is_empty(),
        Expr::String(s) => s.is_empty(),
        Expr::Nil => true,
        _ => return Err(type_error(&args[0], "empty?", "List or String", context)),
    };
    Ok(AstNode::bool(empty, span))
};

pub const ATOM_IS_LIST: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "list?", context, span)?;
    Ok(AstNode::bool(args[0].value.is_list(), span))
};

pub const ATOM_IS_SYMBOL: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "symbol?", context, span)?;
    Ok(AstNode::bool(args[0].value.as_symbol().is_some(), span))
};

pub const ATOM_IS_NIL: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "nil?", context, span)?;
    Ok(AstNode::bool(matches!(*args[0].value, Expr::Nil), span))
};

pub fn register_collection_atoms(registry: &mut AtomRegistry) {
    registry.register("cons", Atom::Primitive(ATOM_CONS));
    registry.register("list", Atom::Primitive(ATOM_LIST));
    registry.register("first", Atom::Primitive(ATOM_FIRST));
    registry.register("rest", Atom::Primitive(ATOM_REST));
    registry.register("count", Atom::Primitive(ATOM_COUNT));
    registry.register("empty?", Atom::Primitive(ATOM_EMPTY));
    registry.register("list?", Atom::Primitive(ATOM_IS_LIST));
    registry.register("symbol?", Atom::Primitive(ATOM_IS_SYMBOL));
    registry.register("nil?", Atom::Primitive(ATOM_IS_NIL));
}
