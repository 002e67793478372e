//! Runtime module
//!
//! Environments and the evaluation machine. All evaluation, including the
//! evaluation performed while probing and invoking macros, goes through
//! [`eval::EvalContext::eval`].

pub mod env;
pub mod eval;

pub use env::Env;
pub use eval::{EvalContext, EvalOptions, EvalResult};
