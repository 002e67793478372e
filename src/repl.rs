//! quasi REPL (Read-Eval-Print Loop)
//!
//! Provides an interactive shell for evaluating expressions with persistent
//! state: definitions and macros from earlier inputs stay visible.

use std::io::{self, Write};

use crate::cli::output::{print_error, print_result, StdoutSink};
use crate::diagnostics::QuasiError;
use crate::engine::Engine;
use crate::err_msg;

/// REPL state that persists across evaluations
pub struct ReplState {
    engine: Engine,
    line_number: usize,
}

impl ReplState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            line_number: 1,
        }
    }

    /// Evaluate one complete input in the persistent global scope.
    pub fn eval_input(&mut self, input: &str) -> Result<(), QuasiError> {
        let source_name = format!("<repl:{}>", self.line_number);
        self.line_number += 1;
        let result = self.engine.run_source(&source_name, input, &mut StdoutSink)?;
        print_result(&result);
        Ok(())
    }
}

/// Main REPL entry point
pub fn run(engine: Engine) -> Result<(), QuasiError> {
    println!("quasi REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit, :clear to reset the state");
    println!();

    let mut state = ReplState::new(engine);
    let mut input_buffer = String::new();

    loop {
        if input_buffer.is_empty() {
            print!("quasi> ");
        } else {
            print!("    -> ");
        }
        let _ = io::stdout().flush();

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| err_msg!(Internal, "error reading input: {}", e))?;
        if read == 0 {
            // EOF (Ctrl+D)
            println!("\nGoodbye!");
            return Ok(());
        }
        let line = line.trim_end();

        if input_buffer.is_empty() && line.trim_start().starts_with(':') {
            match handle_repl_command(line.trim(), &mut state) {
                ReplCommand::Continue => continue,
                ReplCommand::Quit => return Ok(()),
            }
        }

        if !input_buffer.is_empty() {
            input_buffer.push('\n');
        }
        input_buffer.push_str(line);

        // An empty line forces evaluation of an incomplete expression, which
        // then reports the parse error.
        if is_complete_expression(&input_buffer) || line.is_empty() {
            if !input_buffer.trim().is_empty() {
                if let Err(e) = state.eval_input(&input_buffer) {
                    print_error(e);
                }
            }
            input_buffer.clear();
        }
    }
}

/// REPL command results
enum ReplCommand {
    Continue,
    Quit,
}

/// Handle special REPL commands that start with ':'
fn handle_repl_command(command: &str, state: &mut ReplState) -> ReplCommand {
    match command.to_ascii_lowercase().as_str() {
        ":help" | ":h" => {
            println!("quasi REPL Commands:");
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!("  :defs, :d     List every name visible in the global scope");
            println!("  :clear, :c    Forget all definitions and macros");
            println!();
            println!("Multi-line expressions are supported; an empty line submits.");
            ReplCommand::Continue
        }
        ":quit" | ":q" => {
            println!("Goodbye!");
            ReplCommand::Quit
        }
        ":defs" | ":d" => {
            println!("{}", state.engine.global().names().join(" "));
            ReplCommand::Continue
        }
        ":clear" | ":c" => {
            state.engine.reset();
            println!("Context cleared.");
            ReplCommand::Continue
        }
        _ => {
            println!(
                "Unknown command: {}. Type :help for available commands.",
                command
            );
            ReplCommand::Continue
        }
    }
}

/// Balanced-delimiter check; comments and string contents are skipped.
fn is_complete_expression(input: &str) -> bool {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return false;
    }

    let mut paren_count = 0i32;
    let mut in_string = false;
    let mut in_comment = false;
    let mut escape_next = false;

    for ch in trimmed.chars() {
        if in_comment {
            in_comment = ch != '\n';
            continue;
        }
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            ';' if !in_string => in_comment = true,
            '(' if !in_string => paren_count += 1,
            ')' if !in_string => paren_count -= 1,
            _ => {}
        }
    }

    paren_count <= 0 && !in_string
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete_expression() {
        assert!(is_complete_expression("42"));
        assert!(is_complete_expression("(+ 1 2)"));
        assert!(is_complete_expression("(do (def x 10) (+ x 5))"));
        assert!(is_complete_expression("\"hello world\""));
        assert!(is_complete_expression("`(a ,b)"));

        assert!(!is_complete_expression("(+ 1"));
        assert!(!is_complete_expression("(do (def x 10)"));
        assert!(!is_complete_expression("\"unclosed string"));
        assert!(!is_complete_expression("(a ; )\n"));
        assert!(!is_complete_expression(""));
    }

    #[test]
    fn test_state_persists_between_inputs() {
        let mut state = ReplState::new(Engine::new());
        state.eval_input("(defmacro id (fn (x) x))").unwrap();
        state.eval_input("(def y (id 3))").unwrap();
        assert_eq!(state.engine.eval_str("y").unwrap().to_string(), "3");
    }
}
