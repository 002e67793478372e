//! # Diagnostics
//!
//! The unified, `miette`-based error type for every stage of the interpreter:
//! reading, macro expansion, and evaluation all fail with a [`QuasiError`].
//!
//! Expansion has no error category of its own. A failure raised while a macro
//! head is being probed, or while a macro body runs, surfaces exactly like the
//! same failure raised by ordinary evaluation.
//!
//! # Construction
//!
//! - `err_msg!(Eval, "message")` for message-only errors.
//! - `err_src!(TypeError, "message", &named_source, span)` when a source and
//!   span are known.
//! - Inside the evaluator, use the [`ErrorReporting`] methods on the context.
//!
//! Never construct `ErrorContext` by hand unless none of the above fit.

use std::str::FromStr;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::ast::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe error classification matching the [`QuasiError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed source text.
    Parse,
    /// A symbol with no binding in any visible scope.
    UnboundSymbol,
    /// A value of the wrong kind, e.g. a non-callable macro implementation.
    TypeError,
    /// Runtime failures: arity, division by zero, expansion limit.
    Eval,
    Internal,
    TestFailure,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::UnboundSymbol => "UnboundSymbol",
            ErrorType::TypeError => "TypeError",
            ErrorType::Eval => "Eval",
            ErrorType::Internal => "Internal",
            ErrorType::TestFailure => "TestFailure",
        }
    }

    /// The diagnostic code reported to users.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorType::Parse => "quasi::parse",
            ErrorType::UnboundSymbol => "quasi::unbound",
            ErrorType::TypeError => "quasi::type",
            ErrorType::Eval => "quasi::eval",
            ErrorType::Internal => "quasi::internal",
            ErrorType::TestFailure => "quasi::test",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Parse" | "ParseError" => Ok(ErrorType::Parse),
            "UnboundSymbol" | "UnboundSymbolError" => Ok(ErrorType::UnboundSymbol),
            "TypeError" => Ok(ErrorType::TypeError),
            "Eval" => Ok(ErrorType::Eval),
            "Internal" => Ok(ErrorType::Internal),
            "TestFailure" => Ok(ErrorType::TestFailure),
            other => Err(format!("unknown error type '{other}'")),
        }
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for all interpreter failure modes.
#[derive(Debug, Error)]
pub enum QuasiError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
    },
    #[error("Unbound symbol: '{symbol}'")]
    UnboundSymbol {
        symbol: String,
        ctx: ErrorContext,
    },
    #[error("Type error: {message}")]
    TypeError {
        message: String,
        ctx: ErrorContext,
    },
    #[error("Evaluation error: {message}")]
    Eval {
        message: String,
        ctx: ErrorContext,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
    },
    #[error("Test failure: {message}")]
    TestFailure {
        message: String,
        ctx: ErrorContext,
    },
}

impl QuasiError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            QuasiError::Parse { ctx, .. } => ctx,
            QuasiError::UnboundSymbol { ctx, .. } => ctx,
            QuasiError::TypeError { ctx, .. } => ctx,
            QuasiError::Eval { ctx, .. } => ctx,
            QuasiError::Internal { ctx, .. } => ctx,
            QuasiError::TestFailure { ctx, .. } => ctx,
        }
    }

    fn get_ctx_mut(&mut self) -> &mut ErrorContext {
        match self {
            QuasiError::Parse { ctx, .. } => ctx,
            QuasiError::UnboundSymbol { ctx, .. } => ctx,
            QuasiError::TypeError { ctx, .. } => ctx,
            QuasiError::Eval { ctx, .. } => ctx,
            QuasiError::Internal { ctx, .. } => ctx,
            QuasiError::TestFailure { ctx, .. } => ctx,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            QuasiError::Parse { .. } => ErrorType::Parse,
            QuasiError::UnboundSymbol { .. } => ErrorType::UnboundSymbol,
            QuasiError::TypeError { .. } => ErrorType::TypeError,
            QuasiError::Eval { .. } => ErrorType::Eval,
            QuasiError::Internal { .. } => ErrorType::Internal,
            QuasiError::TestFailure { .. } => ErrorType::TestFailure,
        }
    }

    /// The primary span, if the error carries one.
    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }

    /// Attaches a help message, replacing any existing one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.get_ctx_mut().help = Some(help.into());
        self
    }

    fn label_text(&self) -> String {
        match self {
            QuasiError::UnboundSymbol { symbol, .. } => format!("'{symbol}' is not bound"),
            QuasiError::Parse { message, .. }
            | QuasiError::TypeError { message, .. }
            | QuasiError::Eval { message, .. }
            | QuasiError::Internal { message, .. }
            | QuasiError::TestFailure { message, .. } => message.clone(),
        }
    }
}

impl Diagnostic for QuasiError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error_type().code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let label = LabeledSpan::new(Some(self.label_text()), span.start, span_len(&span));
        Some(Box::new(std::iter::once(label)))
    }
}

fn span_len(span: &Span) -> usize {
    if span.end > span.start {
        span.end - span.start
    } else {
        1
    }
}

/// Converts a named source string into a shareable source for error contexts.
pub fn to_error_source(name: impl AsRef<str>, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), source.as_ref().to_string()))
}

// ============================================================================
// CONTEXT-AWARE REPORTING
// ============================================================================

/// Anything that knows the source currently being evaluated can report errors
/// against it.
pub trait ErrorReporting {
    fn source(&self) -> &SourceArc;

    fn report(&self, kind: ErrorType, message: impl Into<String>, span: Span) -> QuasiError {
        let ctx = ErrorContext::with_source_and_span(Arc::clone(self.source()), span);
        let message = message.into();
        match kind {
            ErrorType::Parse => QuasiError::Parse { message, ctx },
            ErrorType::UnboundSymbol => QuasiError::UnboundSymbol {
                symbol: message,
                ctx,
            },
            ErrorType::TypeError => QuasiError::TypeError { message, ctx },
            ErrorType::Eval => QuasiError::Eval { message, ctx },
            ErrorType::Internal => QuasiError::Internal { message, ctx },
            ErrorType::TestFailure => QuasiError::TestFailure { message, ctx },
        }
    }

    fn unbound_symbol(&self, symbol: &str, span: Span) -> QuasiError {
        self.report(ErrorType::UnboundSymbol, symbol, span)
    }

    fn type_mismatch(&self, message: impl Into<String>, span: Span) -> QuasiError {
        self.report(ErrorType::TypeError, message, span)
    }

    fn arity_mismatch(&self, name: &str, expected: &str, actual: usize, span: Span) -> QuasiError {
        self.report(
            ErrorType::Eval,
            format!("'{name}' expects {expected} argument(s), got {actual}"),
            span,
        )
    }

    fn eval_failure(&self, message: impl Into<String>, span: Span) -> QuasiError {
        self.report(ErrorType::Eval, message, span)
    }
}

/// Constructs a QuasiError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:literal $(, $arg:expr)* $(,)?) => {
        $crate::QuasiError::$variant {
            message: format!($msg $(, $arg)*),
            ctx: $crate::ErrorContext::none(),
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::QuasiError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
        }
    };
}

/// Constructs a QuasiError variant with a pre-built `NamedSource`.
#[macro_export]
macro_rules! err_src {
    ($variant:ident, $msg:expr, $source:expr, $span:expr) => {
        $crate::QuasiError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                std::sync::Arc::clone($source),
                $span,
            ),
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_report_renders_label_help_and_code() {
        let src = to_error_source("macros.lisp", "(defmacro m 42)");
        let err = QuasiError::TypeError {
            message: "macro implementation must be a fn".to_string(),
            ctx: ErrorContext::with_source_and_span(src, Span { start: 12, end: 14 }),
        }
        .with_help("wrap the body in (fn ...)");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("macro implementation must be a fn"));
        assert!(output.contains("wrap the body in (fn ...)"));
        assert!(output.contains("quasi::type"));
    }

    #[test]
    fn test_errors_carry_no_cause() {
        use std::error::Error;

        let err = err_msg!(Eval, "read failed");
        assert!(err.source().is_none());
        assert!(Diagnostic::labels(&err).is_none());
    }

    #[test]
    fn test_error_type_round_trips_through_names() {
        for kind in [
            ErrorType::Parse,
            ErrorType::UnboundSymbol,
            ErrorType::TypeError,
            ErrorType::Eval,
        ] {
            assert_eq!(kind.as_str().parse::<ErrorType>(), Ok(kind));
        }
        assert_eq!("UnboundSymbolError".parse::<ErrorType>(), Ok(ErrorType::UnboundSymbol));
        assert!("Nope".parse::<ErrorType>().is_err());
    }

    #[test]
    fn test_err_macros_pick_variant() {
        let err = err_msg!(Eval, "arity {} vs {}", 1, 2);
        assert_eq!(err.error_type(), ErrorType::Eval);
        assert_eq!(err.to_string(), "Evaluation error: arity 1 vs 2");

        let src = to_error_source("t.lisp", "(a");
        let err = err_src!(Parse, "bad", &src, Span { start: 0, end: 2 });
        assert_eq!(err.error_type(), ErrorType::Parse);
        assert_eq!(err.span(), Some(Span { start: 0, end: 2 }));
    }
}
