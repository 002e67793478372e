//! Handles all user-facing output for the CLI.
//!
//! Pretty-printing, colorizing, error rendering, and the output sinks the
//! CLI hands to the engine.

// ============================================================================
// OUTPUT SINKS: OutputBuffer and StdoutSink implementations
// ============================================================================

use crate::ast::{AstNode, Span};
use crate::atoms::OutputSink;
use crate::diagnostics::QuasiError;
use crate::macros::MacroExpansionStep;
use difference::{Changeset, Difference};
use miette::Report;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// OutputBuffer: collects output into a String for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str, _span: Option<&Span>) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// StdoutSink: writes output to stdout for CLI and default runner use.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str, _span: Option<&Span>) {
        println!("{}", text);
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints a macro expansion trace to the console with colored diffs.
pub fn print_trace(trace: &[MacroExpansionStep]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if trace.is_empty() {
        println!("(no macro expansions)");
        return;
    }

    for (i, step) in trace.iter().enumerate() {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = writeln!(stdout, "--- Step {}: {} ---", i + 1, step.macro_name);
        let _ = stdout.reset();

        print_diff(&mut stdout, &step_diff(step).diffs);
        let _ = writeln!(stdout);
    }
}

/// Word-level diff of one expansion step. Printed forms are single lines, so
/// tokens are split on spaces.
pub fn step_diff(step: &MacroExpansionStep) -> Changeset {
    let before = step.input.value.pretty();
    let after = step.output.value.pretty();
    Changeset::new(&before, &after, " ")
}

/// Prints each expansion on its own line.
pub fn print_expansions(expansions: &[AstNode]) {
    for expansion in expansions {
        println!("{}", expansion.value.pretty());
    }
}

/// Prints an evaluation result, skipping `nil`.
pub fn print_result(result: &AstNode) {
    if matches!(*result.value, crate::ast::Expr::Nil) {
        return;
    }
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "{}", result.value.pretty());
    let _ = stdout.reset();
}

/// Prints a QuasiError with full miette diagnostics.
pub fn print_error(error: QuasiError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Prints a colored status line, e.g. for test results.
pub fn print_status(label: &str, color: Color, message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{label}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {message}");
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for (i, diff) in diffs.iter().enumerate() {
        if i > 0 {
            let _ = stdout.reset();
            let _ = write!(stdout, " ");
        }
        match diff {
            Difference::Same(x) => {
                let _ = stdout.reset();
                let _ = write!(stdout, "{}", x);
            }
            Difference::Add(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = write!(stdout, "{{+{}+}}", x);
            }
            Difference::Rem(x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = write!(stdout, "[-{}-]", x);
            }
        }
    }
    let _ = stdout.reset();
    let _ = writeln!(stdout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_diff_keeps_unchanged_words() {
        let step = MacroExpansionStep {
            macro_name: "my-if".to_string(),
            input: AstNode::form(
                "my-if",
                [
                    AstNode::symbol("c", Span::default()),
                    AstNode::number(1.0, Span::default()),
                    AstNode::number(2.0, Span::default()),
                ],
                Span::default(),
            ),
            output: AstNode::form(
                "if",
                [
                    AstNode::symbol("c", Span::default()),
                    AstNode::number(1.0, Span::default()),
                    AstNode::number(2.0, Span::default()),
                ],
                Span::default(),
            ),
        };
        let diffs = step_diff(&step).diffs;
        assert!(diffs.contains(&Difference::Same("c 1 2)".to_string())));
        assert!(diffs.contains(&Difference::Rem("(my-if".to_string())));
        assert!(diffs.contains(&Difference::Add("(if".to_string())));
    }

    #[test]
    fn test_buffer_joins_lines() {
        let mut buffer = OutputBuffer::new();
        buffer.emit("a", None);
        buffer.emit("b", None);
        assert_eq!(buffer.as_str(), "a\nb");
    }
}
