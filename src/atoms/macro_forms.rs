//! Special forms of the macro and quasiquote core.
//!
//! `defmacro` is the only place a macro value is created. `macroexpand` and
//! `quasiquoteexpand` stop after rewriting and return syntax; `quasiquote`
//! rewrites and then evaluates through the normal entry point, so macros
//! inside unquoted code still expand.

use crate::ast::{AstNode, Expr, NativeFn};
use crate::atoms::helpers::{extract_symbol, validate_arity};
use crate::atoms::{Atom, AtomRegistry};
use crate::diagnostics::ErrorReporting;
use crate::macros::{self, quasiquote_expand};

/// `(defmacro name impl)`: evaluates `impl` and binds it as a macro in the
/// current scope, not a child, so sibling forms see it.
pub const ATOM_DEFMACRO: NativeFn = |args, context, env, span| {
    validate_arity(args, 2, "defmacro", context, span)?;
    let name = extract_symbol(&args[0], "defmacro", context)?.to_string();
    let implementation = context.eval(&args[1], env)?;

    let callable = match &*implementation.value {
        Expr::Function(callable) | Expr::Macro(callable) => callable.clone(),
        other => {
            return Err(context
                .type_mismatch(
                    format!(
                        "macro implementation must be a fn, got {} {}",
                        other.type_name(),
                        other.pretty()
                    ),
                    args[1].span,
                )
                .with_help("define the expander with (fn (args...) body)"));
        }
    };

    env.set(name, AstNode::new(Expr::Macro(callable), implementation.span));
    Ok(AstNode::nil(span))
};

/// `(macroexpand form)`: the fully expanded `form`, not evaluated further.
pub const ATOM_MACROEXPAND: NativeFn = |args, context, env, span| {
    validate_arity(args, 1, "macroexpand", context, span)?;
    macros::expand(&args[0], context, env)
};

/// `(quasiquote template)`: rewrites the template, then evaluates the result.
pub const ATOM_QUASIQUOTE: NativeFn = |args, context, env, span| {
    validate_arity(args, 1, "quasiquote", context, span)?;
    let constructor = quasiquote_expand(&args[0]);
    context.eval(&constructor, env)
};

/// `(quasiquoteexpand template)`: the list-constructing rewrite, unevaluated.
pub const ATOM_QUASIQUOTEEXPAND: NativeFn = |args, context, _env, span| {
    validate_arity(args, 1, "quasiquoteexpand", context, span)?;
    Ok(quasiquote_expand(&args[0]))
};

pub fn register_macro_forms(registry: &mut AtomRegistry) {
    registry.register("defmacro", Atom::SpecialForm(ATOM_DEFMACRO));
    registry.register("macroexpand", Atom::SpecialForm(ATOM_MACROEXPAND));
    registry.register("quasiquote", Atom::SpecialForm(ATOM_QUASIQUOTE));
    registry.register("quasiquoteexpand", Atom::SpecialForm(ATOM_QUASIQUOTEEXPAND));
}
