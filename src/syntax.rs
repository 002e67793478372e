//! The reader: source text to [`AstNode`](crate::ast::AstNode)s.
//!
//! Purely syntactic. Reader macros (`'`, `` ` ``, `,`) are applied while the
//! tree is built, so the evaluator only ever sees their long forms.

pub mod parser;
pub mod reader_macros;

pub use parser::{parse, parse_one};
