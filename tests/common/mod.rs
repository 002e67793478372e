//! Shared helpers for integration tests.

#![allow(dead_code)]

use quasi::{Engine, ErrorType};

/// Evaluates `src` in a fresh engine and renders the last value.
pub fn eval(src: &str) -> String {
    match Engine::new().eval_str(src) {
        Ok(value) => value.to_string(),
        Err(e) => panic!("evaluation of {src:?} failed: {e}"),
    }
}

/// Evaluates `src` in a fresh engine and returns the error type it fails with.
pub fn eval_err(src: &str) -> ErrorType {
    match Engine::new().eval_str(src) {
        Ok(value) => panic!("expected {src:?} to fail, got {value}"),
        Err(e) => e.error_type(),
    }
}
