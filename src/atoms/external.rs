//! # External Interface
//!
//! Atoms that produce text for the outside world.
//!
//! ## Atoms Provided
//!
//! - **I/O**: `println`
//! - **Strings**: `str`

use crate::ast::{AstNode, NativeFn};
use crate::atoms::{Atom, AtomRegistry};

// ============================================================================
// I/O OPERATIONS
// ============================================================================

/// Emits its arguments to the output sink, space separated.
///
/// Usage: (println <value> ...)
///
///   Returns: Nil. Strings are written raw, everything else readable.
///
/// Example:
///   (println "x =" 1) ; prints: x = 1
pub const ATOM_PRINTLN: NativeFn = |args, context, _env, span| {
    context.output.emit(&join_display(args, " "), Some(&span));
    Ok(AstNode::nil(span))
};

// ============================================================================
// STRING OPERATIONS
// ============================================================================

/// Concatenates the display form of its arguments.
///
/// Usage: (str <value> ...)
///
/// Example:
///   (str "a" 1 'b) ; => "a1b"
pub const ATOM_STR: NativeFn = |args, _context, _env, span| {
    Ok(AstNode::string(join_display(args, ""), span))
};

fn join_display(args: &[AstNode], separator: &str) -> String {
    args.iter()
        .map(|arg| arg.value.display_string())
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn register_external_atoms(registry: &mut AtomRegistry) {
    registry.register("println", Atom::Primitive(ATOM_PRINTLN));
    registry.register("str", Atom::Primitive(ATOM_STR));
}

#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::cli::output::OutputBuffer;

    #[test]
    fn test_println_writes_to_sink() {
        let engine = Engine::new();
        let mut buffer = OutputBuffer::default();
        engine
            .run_source("t", "(println \"x =\" 1 '(a))", &mut buffer)
            .unwrap();
        assert_eq!(buffer.as_str(), "x = 1 (a)");
    }

    #[test]
    fn test_str_concatenates_display_forms() {
        let value = Engine::new().eval_str("(str \"a\" 1 'b)").unwrap();
        assert_eq!(value.to_string(), "\"a1b\"");
    }
}
