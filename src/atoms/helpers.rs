//! # Atom Helper Infrastructure
//!
//! Arity validation and typed argument extraction shared by every atom
//! domain. All helpers report through [`ErrorReporting`], so errors carry the
//! source being evaluated and the span of the offending argument or call.

use crate::ast::{AstNode, Span};
use crate::diagnostics::{ErrorReporting, QuasiError};
use crate::runtime::eval::EvalContext;

// ============================================================================
// ARITY VALIDATION
// ============================================================================

/// Requires exactly `expected` arguments.
pub fn validate_arity(
    args: &[AstNode],
    expected: usize,
    name: &str,
    context: &EvalContext,
    span: Span,
) -> Result<(), QuasiError> {
    if args.len() == expected {
        return Ok(());
    }
    Err(context.arity_mismatch(name, &expected.to_string(), args.len(), span))
}

/// Requires between `min` and `max` arguments; `max` of `None` is unbounded.
pub fn validate_arity_range(
    args: &[AstNode],
    min: usize,
    max: Option<usize>,
    name: &str,
    context: &EvalContext,
    span: Span,
) -> Result<(), QuasiError> {
    let too_few = args.len() < min;
    let too_many = max.is_some_and(|max| args.len() > max);
    if !too_few && !too_many {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{min} to {max}"),
        None => format!("at least {min}"),
    };
    Err(context.arity_mismatch(name, &expected, args.len(), span))
}

// ============================================================================
// TRAIT-BASED TYPE EXTRACTION
// ============================================================================

/// Extracts a typed view of a node, or reports a type error naming the atom.
pub trait ExtractValue<'n, T> {
    fn extract(&'n self, name: &str, context: &EvalContext) -> Result<T, QuasiError>;
}

impl<'n> ExtractValue<'n, f64> for AstNode {
    fn extract(&'n self, name: &str, context: &EvalContext) -> Result<f64, QuasiError> {
        self.value
            .as_number()
            .ok_or_else(|| type_error(self, name, "Number", context))
    }
}

impl<'n> ExtractValue<'n, &'n str> for AstNode {
    fn extract(&'n self, name: &str, context: &EvalContext) -> Result<&'n str, QuasiError> {
        self.value
            .as_str()
            .ok_or_else(|| type_error(self, name, "String", context))
    }
}

impl<'n> ExtractValue<'n, &'n [AstNode]> for AstNode {
    fn extract(&'n self, name: &str, context: &EvalContext) -> Result<&'n [AstNode], QuasiError> {
        self.value
            .as_list()
            .ok_or_else(|| type_error(self, name, "List", context))
    }
}

/// Symbol names are extracted separately since strings and symbols share `&str`.
pub fn extract_symbol<'n>(
    node: &'n AstNode,
    name: &str,
    context: &EvalContext,
) -> Result<&'n str, QuasiError> {
    node.value
        .as_symbol()
        .ok_or_else(|| type_error(node, name, "Symbol", context))
}

/// Extracts every argument as a number.
pub fn extract_numbers(
    args: &[AstNode],
    name: &str,
    context: &EvalContext,
) -> Result<Vec<f64>, QuasiError> {
    args.iter()
        .map(|arg| -> Result<f64, QuasiError> { arg.extract(name, context) })
        .collect()
}

// ============================================================================
// ERROR CONSTRUCTION
// ============================================================================

/// Type error pointing at `found`.
pub fn type_error(found: &AstNode, name: &str, expected: &str, context: &EvalContext) -> QuasiError {
    context.type_mismatch(
        format!(
            "'{name}' expects a {expected}, got {} {}",
            found.value.type_name(),
            found.value.pretty()
        ),
        found.span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{AtomRegistry, NullSink};
    use crate::diagnostics::{to_error_source, ErrorType};
    use crate::runtime::eval::EvalOptions;

    #[test]
    fn test_arity_messages() {
        let atoms = AtomRegistry::new();
        let mut sink = NullSink;
        let ctx = EvalContext::new(
            &atoms,
            &mut sink,
            to_error_source("t", ""),
            EvalOptions::default(),
        );
        let args = vec![AstNode::number(1.0, Span::default())];

        assert!(validate_arity(&args, 1, "f", &ctx, Span::default()).is_ok());
        let err = validate_arity_range(&args, 2, None, "f", &ctx, Span::default()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Eval);
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_extract_reports_type_name() {
        let atoms = AtomRegistry::new();
        let mut sink = NullSink;
        let ctx = EvalContext::new(
            &atoms,
            &mut sink,
            to_error_source("t", ""),
            EvalOptions::default(),
        );
        let arg = AstNode::string("x", Span::default());

        let number: Result<f64, _> = arg.extract("+", &ctx);
        let err = number.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::TypeError);
        assert!(err.to_string().contains("got String"));

        let text: &str = arg.extract("str", &ctx).unwrap();
        assert_eq!(text, "x");
    }
}
