//! The execution pipeline: parse, then for every top-level form expand and
//! evaluate, in order, against one persistent global environment.
//!
//! An [`Engine`] is the single owner of the atom registry and the global
//! scope. The CLI, the REPL, and the script test runner all go through it.

use std::path::Path;

use crate::ast::{AstNode, Span};
use crate::atoms::{register_all_atoms, AtomRegistry, NullSink, OutputSink};
use crate::diagnostics::{to_error_source, QuasiError, SourceArc};
use crate::err_msg;
use crate::macros::{self, MacroExpansionStep};
use crate::runtime::env::Env;
use crate::runtime::eval::{EvalContext, EvalOptions, EvalResult};
use crate::syntax::parser;

/// Source name used by [`Engine::eval_str`].
pub const EVAL_SOURCE_NAME: &str = "<eval>";

pub struct Engine {
    atoms: AtomRegistry,
    global: Env,
    options: EvalOptions,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(EvalOptions::default())
    }

    pub fn with_options(options: EvalOptions) -> Self {
        let mut atoms = AtomRegistry::new();
        register_all_atoms(&mut atoms);
        let global = atoms.global_env();
        Self {
            atoms,
            global,
            options,
        }
    }

    pub fn atoms(&self) -> &AtomRegistry {
        &self.atoms
    }

    pub fn global(&self) -> &Env {
        &self.global
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Drops every user definition by rebuilding the global scope.
    pub fn reset(&mut self) {
        self.global = self.atoms.global_env();
    }

    // ------------------------------------------------------------------------
    // Pipeline services
    // ------------------------------------------------------------------------

    /// Parses `text`, attributing errors to `name`.
    pub fn parse_source(name: &str, text: &str) -> Result<Vec<AstNode>, QuasiError> {
        let source = to_error_source(name, text);
        parser::parse(text, &source)
    }

    /// Reads a program file.
    pub fn read_file(path: &Path) -> Result<String, QuasiError> {
        std::fs::read_to_string(path)
            .map_err(|e| err_msg!(Internal, "cannot read '{}': {}", path.display(), e))
    }

    /// Evaluates `text` in the global scope, discarding program output.
    pub fn eval_str(&self, text: &str) -> EvalResult {
        let mut sink = NullSink;
        self.run_source(EVAL_SOURCE_NAME, text, &mut sink)
    }

    /// Evaluates every form of `text` in order and returns the last value, or
    /// `nil` for an empty program.
    pub fn run_source(&self, name: &str, text: &str, output: &mut dyn OutputSink) -> EvalResult {
        let source = to_error_source(name, text);
        let forms = parser::parse(text, &source)?;
        let mut context = self.context(source, output, self.options.clone());
        context.eval_body(&forms, &self.global, Span::new(0, text.len()))
    }

    /// Expands each top-level form and then evaluates it, so later forms see
    /// earlier definitions. Returns the expansions.
    pub fn macroexpand_source(
        &self,
        name: &str,
        text: &str,
        output: &mut dyn OutputSink,
    ) -> Result<Vec<AstNode>, QuasiError> {
        let source = to_error_source(name, text);
        let forms = parser::parse(text, &source)?;
        let mut context = self.context(source, output, self.options.clone());

        let mut expansions = Vec::with_capacity(forms.len());
        for form in &forms {
            let expanded = macros::expand(form, &mut context, &self.global)?;
            context.eval_expanded(&expanded, &self.global)?;
            expansions.push(expanded);
        }
        Ok(expansions)
    }

    /// Runs `text` with tracing on and returns every expansion step taken.
    pub fn trace_source(
        &self,
        name: &str,
        text: &str,
        output: &mut dyn OutputSink,
    ) -> Result<Vec<MacroExpansionStep>, QuasiError> {
        let source = to_error_source(name, text);
        let forms = parser::parse(text, &source)?;
        let options = EvalOptions {
            trace_expansions: true,
            ..self.options.clone()
        };
        let mut context = self.context(source, output, options);
        context.eval_body(&forms, &self.global, Span::new(0, text.len()))?;
        Ok(context.trace)
    }

    fn context<'s, 'o>(
        &'s self,
        source: SourceArc,
        output: &'o mut dyn OutputSink,
        options: EvalOptions,
    ) -> EvalContext<'s, 'o> {
        EvalContext::new(&self.atoms, output, source, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn test_definitions_persist_across_runs() {
        let engine = Engine::new();
        engine.eval_str("(def x 41)").unwrap();
        assert_eq!(engine.eval_str("(+ x 1)").unwrap().to_string(), "42");
    }

    #[test]
    fn test_reset_forgets_definitions() {
        let mut engine = Engine::new();
        engine.eval_str("(def x 1)").unwrap();
        engine.reset();
        let err = engine.eval_str("x").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnboundSymbol);
        assert_eq!(engine.eval_str("(+ 1 1)").unwrap().to_string(), "2");
    }

    #[test]
    fn test_lambda_errors_point_into_defining_input() {
        let engine = Engine::new();
        let definition = "(def f (fn () (do 1 2 3 4 5 6 7 8 9 (some-unbound-symbol-here))))";
        engine.eval_str(definition).unwrap();

        let err = engine.eval_str("(f)").unwrap_err();
        let symbol = "some-unbound-symbol-here";
        let start = definition.find(symbol).unwrap();
        assert_eq!(err.span(), Some(Span::new(start, start + symbol.len())));

        let report = format!("{:?}", miette::Report::new(err));
        assert!(!report.contains("Failed to read"));
        assert!(report.contains(symbol));
    }

    #[test]
    fn test_arity_errors_point_at_the_call() {
        let engine = Engine::new();
        engine.eval_str("(def g (fn (a) a))").unwrap();
        let err = engine.eval_str("(g)").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Eval);
        assert_eq!(err.span(), Some(Span::new(0, 3)));
    }

    #[test]
    fn test_empty_program_is_nil() {
        assert_eq!(Engine::new().eval_str("").unwrap().to_string(), "nil");
    }

    #[test]
    fn test_macroexpand_source_sees_earlier_macros() {
        let engine = Engine::new();
        let mut sink = NullSink;
        let expansions = engine
            .macroexpand_source(
                "t",
                "(defmacro unless (fn (c a b) (list 'if c b a))) (unless true 1 2)",
                &mut sink,
            )
            .unwrap();
        assert_eq!(expansions[0].to_string(), "(defmacro unless (fn (c a b) (list (quote if) c b a)))");
        assert_eq!(expansions[1].to_string(), "(if true 2 1)");
    }

    #[test]
    fn test_trace_records_each_step() {
        let engine = Engine::new();
        let mut sink = NullSink;
        let trace = engine
            .trace_source(
                "t",
                "(defmacro twice (fn (x) (list 'once x))) (defmacro once (fn (x) x)) (twice 5)",
                &mut sink,
            )
            .unwrap();
        let names: Vec<&str> = trace.iter().map(|s| s.macro_name.as_str()).collect();
        assert_eq!(names, vec!["twice", "once"]);
        assert_eq!(trace[0].output.to_string(), "(once 5)");
        assert_eq!(trace[1].output.to_string(), "5");
    }

    #[test]
    fn test_expansion_limit_is_opt_in() {
        let engine = Engine::with_options(EvalOptions {
            expansion_limit: Some(10),
            trace_expansions: false,
        });
        let err = engine
            .eval_str("(defmacro loop (fn () (list 'loop))) (loop)")
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Eval);
        assert!(err.to_string().contains("expansion limit"));
    }
}
