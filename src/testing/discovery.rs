use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ast::{AstNode, Span};
use crate::diagnostics::{QuasiError, SourceArc};
use crate::syntax::parser;
use crate::{err_msg, err_src, ErrorType};

/// Extension of script test files.
pub const TEST_FILE_EXTENSION: &str = "lisp";

/// What a test expects its body to produce.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// The last body value must equal this datum (unevaluated, spans ignored).
    Value(AstNode),
    /// The body must fail with an error of this type.
    Error(ErrorType),
}

/// A `(test ...)` form extracted from a script, kept in AST form so spans
/// survive for diagnostics.
#[derive(Debug, Clone)]
pub struct TestDefinition {
    pub name: String,
    pub expectation: Expectation,
    pub body: Vec<AstNode>,
    pub span: Span,
}

/// A parsed script: setup forms in order, then its tests.
#[derive(Debug, Clone)]
pub struct TestScript {
    pub source: SourceArc,
    pub setup: Vec<AstNode>,
    pub tests: Vec<TestDefinition>,
}

/// Discovers tests within a directory tree.
#[derive(Debug)]
pub struct TestDiscoverer;

impl TestDiscoverer {
    fn is_test_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == TEST_FILE_EXTENSION)
    }

    /// Recursively scans a directory for test scripts.
    ///
    /// The returned list of files is sorted to ensure deterministic execution order.
    pub fn discover_test_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, QuasiError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry =
                entry.map_err(|e| err_msg!(Internal, "failed to walk directory: {}", e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !Self::is_test_file(path) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }

    /// Reads and splits a script file.
    pub fn load_script<P: AsRef<Path>>(file_path: P) -> Result<TestScript, QuasiError> {
        let path_str = file_path.as_ref().display().to_string();
        let text = std::fs::read_to_string(file_path.as_ref())
            .map_err(|e| err_msg!(Internal, "failed to read file '{}': {}", path_str, e))?;
        Self::parse_script(&path_str, &text)
    }

    /// Splits source text into setup forms and `(test ...)` definitions.
    ///
    /// No macro expansion happens here; a test form must be written literally.
    pub fn parse_script(name: &str, text: &str) -> Result<TestScript, QuasiError> {
        let source = crate::diagnostics::to_error_source(name, text);
        let ast = parser::parse(text, &source)?;

        let mut setup = Vec::new();
        let mut tests = Vec::new();
        for node in ast {
            if node.value.is_form("test") {
                tests.push(Self::parse_test_form(&node, &source)?);
            } else {
                setup.push(node);
            }
        }

        Ok(TestScript {
            source,
            setup,
            tests,
        })
    }

    fn parse_test_form(node: &AstNode, source: &SourceArc) -> Result<TestDefinition, QuasiError> {
        // (test "test-name" (expect datum) body...)
        // (test "test-name" (expect-error ErrorType) body...)
        let items = node.value.as_list().unwrap_or_default();
        if items.len() < 3 {
            return Err(err_src!(
                Parse,
                "invalid test form: expected a name and an expectation",
                source,
                node.span
            ));
        }

        let name = items[1].value.as_str().ok_or_else(|| {
            err_src!(
                Parse,
                "invalid test form: test name must be a string",
                source,
                items[1].span
            )
        })?;

        Ok(TestDefinition {
            name: name.to_string(),
            expectation: Self::parse_expectation(&items[2], source)?,
            body: items[3..].to_vec(),
            span: node.span,
        })
    }

    fn parse_expectation(node: &AstNode, source: &SourceArc) -> Result<Expectation, QuasiError> {
        let invalid = || {
            err_src!(
                Parse,
                "invalid expectation: use (expect <datum>) or (expect-error <ErrorType>)",
                source,
                node.span
            )
        };
        let items = node.value.as_list().ok_or_else(invalid)?;
        let [head, datum] = items else {
            return Err(invalid());
        };

        match head.value.as_symbol() {
            Some("expect") => Ok(Expectation::Value(datum.clone())),
            Some("expect-error") => {
                let kind = datum.value.as_symbol().ok_or_else(invalid)?;
                kind.parse::<ErrorType>()
                    .map(Expectation::Error)
                    .map_err(|message| err_src!(Parse, message, source, datum.span))
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_setup_from_tests() {
        let script = TestDiscoverer::parse_script(
            "t.lisp",
            "(def a 1) (test \"one\" (expect 1) a) (def b 2) (test \"two\" (expect-error Eval) (/ 1 0))",
        )
        .unwrap();
        assert_eq!(script.setup.len(), 2);
        assert_eq!(script.tests.len(), 2);
        assert_eq!(script.tests[0].name, "one");
        assert!(matches!(script.tests[1].expectation, Expectation::Error(ErrorType::Eval)));
    }

    #[test]
    fn test_rejects_unknown_error_type() {
        let err = TestDiscoverer::parse_script("t.lisp", "(test \"x\" (expect-error Nope) 1)")
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Parse);
    }

    #[test]
    fn test_rejects_missing_expectation() {
        assert!(TestDiscoverer::parse_script("t.lisp", "(test \"x\")").is_err());
    }
}
