//! The evaluation machine.
//!
//! ## Single entry point
//!
//! [`EvalContext::eval`] is the only way any code in the interpreter evaluates
//! a node: top-level forms, arguments, lambda bodies, special-form bodies,
//! the head probe inside macro expansion, and the `eval` primitive all call
//! it. For list input it first runs [`crate::macros::expand`] and only then
//! hands the rewritten node to the base evaluator. Expansion in turn probes
//! heads through this same method, so the two functions are mutually
//! recursive through one dispatch point.
//!
//! ## Calling conventions
//!
//! Special forms (registered as `Atom::SpecialForm`) receive raw syntax and
//! decide what to evaluate. Everything else is evaluated head first, then
//! arguments left to right, then applied.
//!
//! ## Resource model
//!
//! Evaluation is synchronous and recursive. Depth is bounded only by the host
//! stack; a runaway recursion exhausts it and aborts the process. The one
//! opt-in guard is [`EvalOptions::expansion_limit`].

use crate::ast::{AstNode, Callable, Expr, Lambda, Span};
use crate::atoms::{AtomRegistry, OutputSink};
use crate::diagnostics::{ErrorReporting, QuasiError, SourceArc};
use crate::macros::{self, MacroExpansionStep};
use crate::runtime::env::Env;

pub type EvalResult = Result<AstNode, QuasiError>;

/// Caller-tunable evaluation settings.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Maximum number of successive expansions of a single form. `None`
    /// leaves expansion unbounded.
    pub expansion_limit: Option<usize>,
    /// Record every expansion step in [`EvalContext::trace`].
    pub trace_expansions: bool,
}

/// State threaded through every evaluation step.
pub struct EvalContext<'a, 'o> {
    pub atoms: &'a AtomRegistry,
    pub output: &'o mut dyn OutputSink,
    pub source: SourceArc,
    pub options: EvalOptions,
    pub trace: Vec<MacroExpansionStep>,
}

impl ErrorReporting for EvalContext<'_, '_> {
    fn source(&self) -> &SourceArc {
        &self.source
    }
}

impl<'a, 'o> EvalContext<'a, 'o> {
    pub fn new(
        atoms: &'a AtomRegistry,
        output: &'o mut dyn OutputSink,
        source: SourceArc,
        options: EvalOptions,
    ) -> Self {
        Self {
            atoms,
            output,
            source,
            options,
            trace: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Entry point
    // ------------------------------------------------------------------------

    /// Evaluates `ast` in `env`, expanding macros first when `ast` is a list.
    pub fn eval(&mut self, ast: &AstNode, env: &Env) -> EvalResult {
        if ast.value.is_list() {
            let expanded = macros::expand(ast, self, env)?;
            return self.eval_expanded(&expanded, env);
        }
        self.eval_expanded(ast, env)
    }

    /// Evaluates a sequence of forms, returning the last result or `nil`.
    pub fn eval_body(&mut self, body: &[AstNode], env: &Env, span: Span) -> EvalResult {
        let mut result = AstNode::nil(span);
        for form in body {
            result = self.eval(form, env)?;
        }
        Ok(result)
    }

    /// Evaluates each argument in order.
    pub fn eval_args(&mut self, args: &[AstNode], env: &Env) -> Result<Vec<AstNode>, QuasiError> {
        args.iter().map(|arg| self.eval(arg, env)).collect()
    }

    /// True when `head` is a symbol naming a registered special form.
    pub fn is_special_form(&self, head: &AstNode) -> bool {
        head.value
            .as_symbol()
            .is_some_and(|name| self.atoms.special_form(name).is_some())
    }

    // ------------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------------

    /// Applies a function or macro value to already-prepared arguments.
    pub fn apply(
        &mut self,
        callee: &AstNode,
        args: &[AstNode],
        env: &Env,
        span: Span,
    ) -> EvalResult {
        match &*callee.value {
            Expr::Function(callable) | Expr::Macro(callable) => {
                self.call(callable, args, env, span)
            }
            other => Err(self.type_mismatch(
                format!("{} is not callable: {}", other.type_name(), other.pretty()),
                callee.span,
            )),
        }
    }

    /// Invokes a callable. `env` is the caller's environment, which native
    /// primitives may inspect; lambdas run in a child of their own.
    pub fn call(
        &mut self,
        callable: &Callable,
        args: &[AstNode],
        env: &Env,
        span: Span,
    ) -> EvalResult {
        match callable {
            Callable::Native { func, .. } => func(args, self, env, span),
            Callable::Lambda(lambda) => self.call_lambda(lambda, args, span),
        }
    }

    fn call_lambda(&mut self, lambda: &Lambda, args: &[AstNode], span: Span) -> EvalResult {
        let params = &lambda.params;
        let required = params.required.len();
        let arity_ok = match params.rest {
            Some(_) => args.len() >= required,
            None => args.len() == required,
        };
        if !arity_ok {
            let expected = match params.rest {
                Some(_) => format!("at least {required}"),
                None => required.to_string(),
            };
            return Err(self.arity_mismatch("fn", &expected, args.len(), span));
        }

        let frame = lambda.env.child();
        for (name, arg) in params.required.iter().zip(args) {
            frame.set(name.clone(), arg.clone());
        }
        if let Some(rest) = &params.rest {
            frame.set(rest.clone(), AstNode::list(args[required..].to_vec(), span));
        }

        // Errors raised in the body point into the defining input.
        let caller_source = std::mem::replace(&mut self.source, lambda.source.clone());
        let result = self.eval_body(&lambda.body, &frame, span);
        self.source = caller_source;
        result
    }

    // ------------------------------------------------------------------------
    // Base evaluator (never expands on its own)
    // ------------------------------------------------------------------------

    /// Evaluates `ast` without expanding it first. Sub-forms still go through
    /// [`EvalContext::eval`].
    pub fn eval_expanded(&mut self, ast: &AstNode, env: &Env) -> EvalResult {
        match &*ast.value {
            Expr::Symbol(name) => env
                .get(name)
                .map(|value| value.respan(ast.span))
                .ok_or_else(|| self.unbound_symbol(name, ast.span)),
            Expr::List(items) if !items.is_empty() => self.eval_list(items, ast.span, env),
            _ => Ok(ast.clone()),
        }
    }

    fn eval_list(&mut self, items: &[AstNode], span: Span, env: &Env) -> EvalResult {
        let head = &items[0];
        let tail = &items[1..];

        if let Some(form) = head.value.as_symbol().and_then(|s| self.atoms.special_form(s)) {
            return form(tail, self, env, span);
        }

        let callee = self.eval(head, env)?;
        let args = self.eval_args(tail, env)?;
        self.apply(&callee, &args, env, span)
    }
}
