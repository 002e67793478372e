// # Quasi Atom System
//
// Atoms are the operations the evaluator knows natively. Every atom is
// registered under a name with one of two calling conventions:
//
// 1.  **`Primitive`**: arguments are evaluated left to right before the call.
//     Primitives are bound in the global environment as ordinary function
//     values, so they can be passed around, shadowed, and applied like lambdas.
//
// 2.  **`SpecialForm`**: arguments arrive as raw syntax and the form decides
//     what to evaluate. Special forms are never bound in an environment; the
//     evaluator recognises them by head symbol, and macro expansion leaves
//     special-form-headed lists alone.
//
// ## Module Structure
//
// - **`helpers`**: arity checks and typed argument extraction
// - **`special_forms`**: `quote`, `if`, `def`, `fn`, `do`, `let`
// - **`macro_forms`**: `defmacro`, `macroexpand`, `quasiquote`, `quasiquoteexpand`
// - **`math`**: `+`, `-`, `*`, `/`, `mod`
// - **`logic`**: `=`, `<`, `>`, `<=`, `>=`, `not`
// - **`collections`**: `cons`, `list`, `first`, `rest`, `count` and predicates
// - **`meta`**: `read`, `eval`, `print`, `defs`
// - **`external`**: `println`, `str`

use im::HashMap;

use crate::ast::{AstNode, Callable, Expr, NativeFn, Span};
use crate::runtime::env::Env;

/// The two calling conventions.
#[derive(Clone, Copy)]
pub enum Atom {
    SpecialForm(NativeFn),
    Primitive(NativeFn),
}

// Output sink for `println`, etc., to make I/O testable and injectable.
pub trait OutputSink {
    fn emit(&mut self, text: &str, span: Option<&Span>);
}

// A null output sink for testing or running without output.
pub struct NullSink;
impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str, _span: Option<&Span>) {}
}

// Registry for all atoms, inspectable at runtime.
#[derive(Default, Clone)]
pub struct AtomRegistry {
    pub atoms: HashMap<&'static str, Atom>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Atom> {
        self.atoms.get(name)
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.atoms.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn register(&mut self, name: &'static str, atom: Atom) {
        self.atoms.insert(name, atom);
    }

    pub fn has(&self, name: &str) -> bool {
        self.atoms.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// The special form registered under `name`, if any.
    pub fn special_form(&self, name: &str) -> Option<NativeFn> {
        match self.atoms.get(name) {
            Some(Atom::SpecialForm(func)) => Some(*func),
            _ => None,
        }
    }

    /// A fresh root environment with every primitive bound as a function value.
    pub fn global_env(&self) -> Env {
        let env = Env::new();
        for (name, atom) in self.atoms.iter() {
            if let Atom::Primitive(func) = atom {
                let value = Expr::Function(Callable::native(*name, *func));
                env.set(*name, AstNode::new(value, Span::default()));
            }
        }
        env
    }
}

// ============================================================================
// MODULAR ATOM IMPLEMENTATIONS
// ============================================================================

// Core infrastructure shared by all atoms
pub mod helpers;

// Domain-specific atom modules
pub mod collections;
pub mod external;
pub mod logic;
pub mod macro_forms;
pub mod math;
pub mod meta;
pub mod special_forms;

// ============================================================================
// UNIFIED REGISTRATION FUNCTION
// ============================================================================

/// Registers all standard atoms from all modules with the given registry.
pub fn register_all_atoms(registry: &mut AtomRegistry) {
    special_forms::register_special_forms(registry);
    macro_forms::register_macro_forms(registry);
    math::register_math_atoms(registry);
    logic::register_logic_atoms(registry);
    collections::register_collection_atoms(registry);
    meta::register_meta_atoms(registry);
    external::register_external_atoms(registry);
}
