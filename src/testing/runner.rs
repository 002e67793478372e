use std::path::Path;

use crate::ast::AstNode;
use crate::cli::output::OutputBuffer;
use crate::diagnostics::{QuasiError, SourceArc};
use crate::engine::Engine;
use crate::err_src;
use crate::runtime::eval::EvalContext;
use crate::testing::discovery::{Expectation, TestDefinition, TestDiscoverer, TestScript};

/// Outcome of one `(test ...)` form.
#[derive(Debug)]
pub struct TestResult {
    pub file: String,
    pub name: String,
    pub outcome: Result<(), QuasiError>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Results across a whole run, plus files that could not be run at all.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub results: Vec<TestResult>,
    pub file_errors: Vec<(String, QuasiError)>,
}

impl TestSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.file_errors.is_empty()
    }
}

/// Executes script tests through the same engine the CLI uses.
///
/// Each script gets a fresh engine. Setup forms run once, in order, in its
/// global scope; every test body then runs in its own child scope so tests
/// cannot see each other's definitions.
pub struct TestRunner;

impl TestRunner {
    pub fn run_directory<P: AsRef<Path>>(root: P) -> Result<TestSummary, QuasiError> {
        let mut summary = TestSummary::default();
        for file in TestDiscoverer::discover_test_files(root)? {
            let name = file.display().to_string();
            match TestDiscoverer::load_script(&file).and_then(|s| Self::run_script(&name, &s)) {
                Ok(results) => summary.results.extend(results),
                Err(error) => summary.file_errors.push((name, error)),
            }
        }
        Ok(summary)
    }

    pub fn run_source(name: &str, text: &str) -> Result<Vec<TestResult>, QuasiError> {
        let script = TestDiscoverer::parse_script(name, text)?;
        Self::run_script(name, &script)
    }

    /// Runs setup, then every test. A failing setup form fails the script.
    pub fn run_script(file: &str, script: &TestScript) -> Result<Vec<TestResult>, QuasiError> {
        let engine = Engine::new();
        let mut output = OutputBuffer::new();
        let mut context = EvalContext::new(
            engine.atoms(),
            &mut output,
            script.source.clone(),
            engine.options().clone(),
        );
        for form in &script.setup {
            context.eval(form, engine.global())?;
        }

        Ok(script
            .tests
            .iter()
            .map(|test| TestResult {
                file: file.to_string(),
                name: test.name.clone(),
                outcome: Self::run_single_test(&mut context, &engine, test, &script.source),
            })
            .collect())
    }

    pub fn run_single_test(
        context: &mut EvalContext,
        engine: &Engine,
        test: &TestDefinition,
        source: &SourceArc,
    ) -> Result<(), QuasiError> {
        let scope = engine.global().child();
        let actual = context.eval_body(&test.body, &scope, test.span);
        match (&test.expectation, actual) {
            (Expectation::Value(expected), Ok(actual)) => {
                Self::check_value(test, expected, &actual, source)
            }
            (Expectation::Value(_), Err(error)) => Err(error),
            (Expectation::Error(expected), Ok(actual)) => Err(err_src!(
                TestFailure,
                format!(
                    "\"{}\": expected {} error, got {}",
                    test.name,
                    expected,
                    actual.value.pretty()
                ),
                source,
                test.span
            )),
            (Expectation::Error(expected), Err(error)) if error.error_type() == *expected => Ok(()),
            (Expectation::Error(expected), Err(error)) => Err(err_src!(
                TestFailure,
                format!(
                    "\"{}\": expected {} error, got {} error: {}",
                    test.name,
                    expected,
                    error.error_type(),
                    error
                ),
                source,
                test.span
            )),
        }
    }

    fn check_value(
        test: &TestDefinition,
        expected: &AstNode,
        actual: &AstNode,
        source: &SourceArc,
    ) -> Result<(), QuasiError> {
        if actual == expected {
            return Ok(());
        }
        Err(err_src!(
            TestFailure,
            format!(
                "\"{}\": expected {}, got {}",
                test.name,
                expected.value.pretty(),
                actual.value.pretty()
            ),
            source,
            test.span
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    #[test]
    fn test_value_and_error_expectations() {
        let results = TestRunner::run_source(
            "t.lisp",
            r#"
            (def a 5)
            (test "quasi" (expect (1 5 3)) `(1 ,a 3))
            (test "unbound" (expect-error UnboundSymbol) nope)
            (test "wrong" (expect 2) 3)
            "#,
        )
        .unwrap();
        assert!(results[0].passed());
        assert!(results[1].passed());
        let failure = results[2].outcome.as_ref().unwrap_err();
        assert_eq!(failure.error_type(), ErrorType::TestFailure);
    }

    #[test]
    fn test_bodies_do_not_share_scope() {
        let results = TestRunner::run_source(
            "t.lisp",
            r#"
            (test "defines" (expect 1) (def local 1) local)
            (test "isolated" (expect-error UnboundSymbol) local)
            "#,
        )
        .unwrap();
        assert!(results.iter().all(TestResult::passed));
    }
}
