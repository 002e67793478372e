//! The quasi command-line interface.
//!
//! Parses arguments, builds an [`Engine`] with the requested options, and
//! dispatches to one handler per subcommand. Handlers return errors; only
//! [`run`] prints them and picks the exit code.

use std::path::Path;
use std::process;

use clap::Parser;
use termcolor::Color;

use crate::cli::args::{Command, QuasiArgs};
use crate::cli::output::{
    print_error, print_expansions, print_result, print_status, print_trace, StdoutSink,
};
use crate::diagnostics::QuasiError;
use crate::engine::Engine;
use crate::err_msg;
use crate::runtime::eval::EvalOptions;
use crate::testing::TestRunner;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = QuasiArgs::parse();
    let options = EvalOptions {
        expansion_limit: args.expansion_limit,
        trace_expansions: false,
    };

    let result = match args.command {
        Command::Run { file } => handle_run(&file, options),
        Command::Macroexpand { file } => handle_macroexpand(&file, options),
        Command::Macrotrace { file } => handle_macrotrace(&file, options),
        Command::Ast { file } => handle_ast(&file),
        Command::Test { path } => handle_test(&path),
        Command::ListAtoms => {
            handle_list_atoms();
            Ok(())
        }
        Command::Repl => crate::repl::run(Engine::with_options(options)),
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn handle_run(path: &Path, options: EvalOptions) -> Result<(), QuasiError> {
    let text = Engine::read_file(path)?;
    let engine = Engine::with_options(options);
    let result = engine.run_source(&path.display().to_string(), &text, &mut StdoutSink)?;
    print_result(&result);
    Ok(())
}

fn handle_macroexpand(path: &Path, options: EvalOptions) -> Result<(), QuasiError> {
    let text = Engine::read_file(path)?;
    let engine = Engine::with_options(options);
    let expansions =
        engine.macroexpand_source(&path.display().to_string(), &text, &mut StdoutSink)?;
    print_expansions(&expansions);
    Ok(())
}

fn handle_macrotrace(path: &Path, options: EvalOptions) -> Result<(), QuasiError> {
    let text = Engine::read_file(path)?;
    let engine = Engine::with_options(options);
    let trace = engine.trace_source(&path.display().to_string(), &text, &mut StdoutSink)?;
    print_trace(&trace);
    Ok(())
}

fn handle_ast(path: &Path) -> Result<(), QuasiError> {
    let text = Engine::read_file(path)?;
    let nodes = Engine::parse_source(&path.display().to_string(), &text)?;
    let json = serde_json::to_string_pretty(&nodes)
        .map_err(|e| err_msg!(Internal, "cannot serialise syntax tree: {}", e))?;
    println!("{json}");
    Ok(())
}

fn handle_test(path: &Path) -> Result<(), QuasiError> {
    let summary = TestRunner::run_directory(path)?;

    for result in &summary.results {
        match &result.outcome {
            Ok(()) => print_status(
                "PASS",
                Color::Green,
                &format!("{} :: {}", result.file, result.name),
            ),
            Err(error) => {
                print_status(
                    "FAIL",
                    Color::Red,
                    &format!("{} :: {}", result.file, result.name),
                );
                eprintln!("  {error}");
            }
        }
    }
    let passed = summary.passed();
    let failed = summary.failed();
    let broken = summary.file_errors.len();
    for (file, error) in summary.file_errors {
        print_status("ERROR", Color::Red, &file);
        print_error(error);
    }

    println!("\n{passed} passed, {failed} failed");
    if failed > 0 || broken > 0 {
        return Err(err_msg!(
            TestFailure,
            "{} test(s) failed, {} file(s) could not run",
            failed,
            broken
        ));
    }
    Ok(())
}

fn handle_list_atoms() {
    let engine = Engine::new();
    for name in engine.atoms().list() {
        let kind = match engine.atoms().special_form(name) {
            Some(_) => "special form",
            None => "primitive",
        };
        println!("{name:<18} {kind}");
    }
}
