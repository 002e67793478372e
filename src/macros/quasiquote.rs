//! # Quasiquote Expansion Engine
//!
//! Compiles a template into an expression that rebuilds it at evaluation time:
//!
//! - `(unquote x)` becomes `x`, evaluated later in the caller's scope.
//! - A non-empty list `(h t...)` becomes `(cons qq(h) qq((t...)))`, so every
//!   element, however deeply nested, is subject to the same rule.
//! - Atoms and `()` become `(quote atom)`.
//!
//! Splicing (`unquote-splicing`) is not supported; build such lists with
//! explicit `cons`/`list` calls. The generated `cons` is looked up in the
//! evaluation environment like any other symbol.

use crate::ast::{AstNode, Span};

pub const QUOTE: &str = "quote";
pub const QUASIQUOTE: &str = "quasiquote";
pub const UNQUOTE: &str = "unquote";
pub const CONS: &str = "cons";

/// Translates `template` into a list-constructing expression.
///
/// Infallible: a bare `(unquote)` yields `nil`, and anything after the first
/// argument of `unquote` is ignored.
pub fn quasiquote_expand(template: &AstNode) -> AstNode {
    let items = match template.value.as_list() {
        Some(items) if !items.is_empty() => items,
        _ => return AstNode::form(QUOTE, [template.clone()], template.span),
    };

    if template.value.is_form(UNQUOTE) {
        return items
            .get(1)
            .cloned()
            .unwrap_or_else(|| AstNode::nil(template.span));
    }

    let tail_span = items
        .get(1)
        .map_or(Span::new(template.span.end, template.span.end), |next| {
            Span::new(next.span.start, template.span.end)
        });
    let tail = AstNode::list(items[1..].to_vec(), tail_span);

    AstNode::form(
        CONS,
        [quasiquote_expand(&items[0]), quasiquote_expand(&tail)],
        template.span,
    )
}
