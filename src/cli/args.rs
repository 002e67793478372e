//! Defines the command-line arguments and subcommands for the quasi CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "quasi",
    version,
    about = "A minimal Lisp with defmacro, quasiquote and reader macros."
)]
pub struct QuasiArgs {
    /// Fail when a single form needs more than N successive macro expansions.
    #[arg(long, global = true, value_name = "N")]
    pub expansion_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full pipeline: parse, expand, evaluate, and print the last value.
    Run {
        /// The path to the script file to run.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the macro-expanded form of every top-level form.
    Macroexpand {
        /// The path to the script file to expand.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Show a stepwise macro expansion trace with diffs.
    Macrotrace {
        /// The path to the script file to trace.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Show the parsed syntax tree as JSON.
    Ast {
        /// The path to the script file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Discover and run all test scripts in a directory.
    Test {
        /// The path to the directory containing test scripts.
        #[arg(default_value = "tests/scripts")]
        path: PathBuf,
    },
    /// List every special form and primitive.
    ListAtoms,
    /// Start an interactive session.
    Repl,
}
