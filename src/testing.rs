//! Script tests.
//!
//! A test script is a `.lisp` file mixing ordinary top-level forms (setup)
//! with `(test "name" <expectation> body...)` forms, where the expectation is
//! `(expect <datum>)` or `(expect-error <ErrorType>)`.

pub mod discovery;
pub mod runner;

pub use discovery::{Expectation, TestDefinition, TestDiscoverer, TestScript};
pub use runner::{TestResult, TestRunner, TestSummary};
