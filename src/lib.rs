pub use crate::diagnostics::{to_error_source, ErrorContext, ErrorType, QuasiError};
pub use crate::engine::Engine;

pub mod ast;
pub mod atoms;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod macros;
pub mod repl;
pub mod runtime;
pub mod syntax;
pub mod testing;
