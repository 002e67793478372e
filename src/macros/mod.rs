//! # Macro Expansion Engine
//!
//! Eliminates leading-position macro calls from a list form before the base
//! evaluator sees it.
//!
//! ## Algorithm
//!
//! 1. A node that is not a non-empty list is returned unchanged.
//! 2. A list headed by a special-form symbol is returned unchanged.
//! 3. Otherwise the head is evaluated through [`EvalContext::eval`], the
//!    same entry point ordinary evaluation uses. Errors from that probe
//!    propagate untouched, so an unbound head fails identically whether or
//!    not the form would have been a macro call.
//! 4. If the head is an `Expr::Macro`, the macro is invoked on the raw,
//!    unevaluated tail and the result replaces the form; go to step 1.
//! 5. Otherwise the form is returned unchanged.
//!
//! Expansion only rewrites the head position. Arguments are expanded later,
//! when the evaluator reaches them through the entry point.
//!
//! ## Termination
//!
//! A macro whose expansion is always headed by itself never terminates. No
//! guard is applied unless the caller sets
//! [`EvalOptions::expansion_limit`](crate::runtime::EvalOptions).

use crate::ast::{AstNode, Expr};
use crate::diagnostics::ErrorReporting;
use crate::runtime::env::Env;
use crate::runtime::eval::{EvalContext, EvalResult};

pub mod quasiquote;

pub use quasiquote::quasiquote_expand;

/// One expansion step, recorded when tracing is enabled.
#[derive(Debug, Clone)]
pub struct MacroExpansionStep {
    /// The head of the expanded form, as written.
    pub macro_name: String,
    /// The form before this step.
    pub input: AstNode,
    /// The macro's result.
    pub output: AstNode,
}

/// Fully expands the head position of `ast` in `env`.
pub fn expand(ast: &AstNode, context: &mut EvalContext, env: &Env) -> EvalResult {
    let mut current = ast.clone();
    let mut steps = 0usize;

    loop {
        let Some(items) = current.value.as_list() else {
            return Ok(current);
        };
        let Some(head) = items.first() else {
            return Ok(current);
        };
        if context.is_special_form(head) {
            return Ok(current);
        }

        let head_value = context.eval(head, env)?;
        let Expr::Macro(expander) = &*head_value.value else {
            return Ok(current);
        };

        steps += 1;
        if let Some(limit) = context.options.expansion_limit {
            if steps > limit {
                return Err(context
                    .eval_failure(
                        format!("macro expansion limit of {limit} exceeded while expanding '{head}'"),
                        current.span,
                    )
                    .with_help("a macro whose expansion is headed by itself never terminates"));
            }
        }

        let expansion = context.call(expander, &items[1..], env, current.span)?;
        if context.options.trace_expansions {
            context.trace.push(MacroExpansionStep {
                macro_name: head.to_string(),
                input: current.clone(),
                output: expansion.clone(),
            });
        }
        current = expansion;
    }
}
