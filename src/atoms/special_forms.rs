//! Core special forms.
//!
//! Each form receives its arguments unevaluated and the environment of the
//! call site. None of them is ever macro-expanded as a whole, although the
//! sub-forms they evaluate go through the normal entry point and therefore
//! through expansion.

use std::rc::Rc;

use crate::ast::{AstNode, Callable, Expr, Lambda, NativeFn, ParamList};
use crate::atoms::helpers::{extract_symbol, validate_arity, validate_arity_range};
use crate::atoms::{Atom, AtomRegistry};
use crate::diagnostics::{ErrorReporting, QuasiError};
use crate::runtime::eval::EvalContext;

/// Prefix marking the variadic parameter in a `fn` parameter list.
pub const REST_PREFIX: &str = "...";

/// `(quote form)`: returns `form` untouched.
pub const ATOM_QUOTE: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "quote", context, span)?;
    Ok(args[0].clone())
};

/// `(if cond then [else])`: only `nil` and `false` select the else branch.
pub const ATOM_IF: NativeFn = |args, context, env, span| {
    validate_arity_range(args, 2, Some(3), "if", context, span)?;
    let condition = context.eval(&args[0], env)?;
    if condition.value.is_truthy() {
        context.eval(&args[1], env)
    } else if let Some(otherwise) = args.get(2) {
        context.eval(otherwise, env)
    } else {
        Ok(AstNode::nil(span))
    }
};

/// `(def name value)`: binds in the current scope and returns the value.
pub const ATOM_DEF: NativeFn = |args, context, env, span| {
    validate_arity(args, 2, "def", context, span)?;
    let name = extract_symbol(&args[0], "def", context)?.to_string();
    let value = context.eval(&args[1], env)?;
    env.set(name, value.clone());
    Ok(value)
};

/// `(fn (params...) body...)`: builds a closure over the current scope.
pub const ATOM_FN: NativeFn = |args, context, env, span| {
    validate_arity_range(args, 1, None, "fn", context, span)?;
    let params = parse_params(&args[0], context)?;
    let lambda = Lambda {
        params,
        body: args[1..].to_vec(),
        env: env.clone(),
        span,
        source: context.source.clone(),
    };
    Ok(AstNode::new(
        Expr::Function(Callable::Lambda(Rc::new(lambda))),
        span,
    ))
};

/// `(do forms...)`: evaluates in order, yielding the last value or `nil`.
pub const ATOM_DO: NativeFn = |args, context, env, span| {
    context.eval_body(args, env, span)
};

/// `(let (name value ...) body...)`: binds sequentially in a child scope.
pub const ATOM_LET: NativeFn = |args, context, env, span| {
    validate_arity_range(args, 1, None, "let", context, span)?;
    let bindings = args[0]
        .value
        .as_list()
        .ok_or_else(|| context.type_mismatch("'let' expects a binding list", args[0].span))?;
    if bindings.len() % 2 != 0 {
        return Err(context.eval_failure(
            "'let' bindings must come in name/value pairs",
            args[0].span,
        ));
    }

    let frame = env.child();
    for pair in bindings.chunks(2) {
        let name = extract_symbol(&pair[0], "let", context)?.to_string();
        let value = context.eval(&pair[1], &frame)?;
        frame.set(name, value);
    }
    context.eval_body(&args[1..], &frame, span)
};

/// Parses `(a b ...rest)` into required names and an optional rest name.
pub fn parse_params(node: &AstNode, context: &EvalContext) -> Result<ParamList, QuasiError> {
    let items = node
        .value
        .as_list()
        .ok_or_else(|| context.type_mismatch("'fn' expects a parameter list", node.span))?;

    let mut params = ParamList {
        required: Vec::new(),
        rest: None,
        span: node.span,
    };

    for (index, item) in items.iter().enumerate() {
        let name = extract_symbol(item, "fn", context)?;
        let Some(rest) = name.strip_prefix(REST_PREFIX) else {
            params.required.push(name.to_string());
            continue;
        };
        if rest.is_empty() || index + 1 != items.len() {
            return Err(context
                .eval_failure(format!("invalid rest parameter '{name}'"), item.span)
                .with_help("a rest parameter must be named and come last"));
        }
        params.rest = Some(rest.to_string());
    }

    Ok(params)
}

pub fn register_special_forms(registry: &mut AtomRegistry) {
    registry.register("quote", Atom::SpecialForm(ATOM_QUOTE));
    registry.register("if", Atom::SpecialForm(ATOM_IF));
    registry.register("def", Atom::SpecialForm(ATOM_DEF));
    registry.register("fn", Atom::SpecialForm(ATOM_FN));
    registry.register("do", Atom::SpecialForm(ATOM_DO));
    registry.register("let", Atom::SpecialForm(ATOM_LET));
}
