//! Lexical environments.
//!
//! An [`Env`] is a cheap, shareable handle to one scope. Scopes chain to a
//! parent; lookups walk outward and the innermost binding wins. A child keeps
//! its parent alive, so closures may outlive the call that created them.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use im::HashMap;

use crate::ast::AstNode;

#[derive(Clone)]
pub struct Env(Rc<Scope>);

struct Scope {
    bindings: RefCell<HashMap<String, AstNode>>,
    parent: Option<Env>,
}

impl Env {
    /// A fresh root scope with no bindings.
    pub fn new() -> Self {
        Env(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    /// A new, empty scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    pub fn parent(&self) -> Option<&Env> {
        self.0.parent.as_ref()
    }

    /// Looks `name` up in this scope, then in each ancestor.
    pub fn get(&self, name: &str) -> Option<AstNode> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(value) = env.0.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            scope = env.parent();
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Binds `name` in this scope, shadowing any ancestor binding.
    pub fn set(&self, name: impl Into<String>, value: AstNode) {
        self.0.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Every name visible from this scope, own and inherited, deduplicated.
    pub fn names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        let mut scope = Some(self);
        while let Some(env) = scope {
            names.extend(env.0.bindings.borrow().keys().cloned());
            scope = env.parent();
        }
        names.into_iter().collect()
    }

    /// Number of ancestors above this scope.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent();
        while let Some(env) = scope {
            depth += 1;
            scope = env.parent();
        }
        depth
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("depth", &self.depth())
            .field("bindings", &self.0.bindings.borrow().len())
            .finish()
    }
}
