//! The reader-macro table.
//!
//! Maps a single trigger character to a rewrite of the form read right after
//! it. Built once, on first use, and read-only afterwards.
//!
//! | trigger | input | output             |
//! |---------|-------|--------------------|
//! | `'`     | `F`   | `(quote F)`        |
//! | `` ` `` | `F`   | `(quasiquote F)`   |
//! | `,`     | `F`   | `(unquote F)`      |

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{AstNode, Span};
use crate::macros::quasiquote::{QUASIQUOTE, QUOTE, UNQUOTE};

/// Rewrites the form following a trigger; `span` covers trigger and form.
pub type ReaderMacro = fn(form: AstNode, span: Span) -> AstNode;

static READER_MACROS: Lazy<HashMap<char, ReaderMacro>> = Lazy::new(|| {
    let mut table: HashMap<char, ReaderMacro> = HashMap::new();
    table.insert('\'', quote_form);
    table.insert('`', quasiquote_form);
    table.insert(',', unquote_form);
    table
});

/// The rewrite registered for `trigger`, if any.
pub fn lookup(trigger: char) -> Option<ReaderMacro> {
    READER_MACROS.get(&trigger).copied()
}

/// All registered triggers, sorted.
pub fn triggers() -> Vec<char> {
    let mut triggers: Vec<char> = READER_MACROS.keys().copied().collect();
    triggers.sort_unstable();
    triggers
}

fn quote_form(form: AstNode, span: Span) -> AstNode {
    AstNode::form(QUOTE, [form], span)
}

fn quasiquote_form(form: AstNode, span: Span) -> AstNode {
    AstNode::form(QUASIQUOTE, [form], span)
}

fn unquote_form(form: AstNode, span: Span) -> AstNode {
    AstNode::form(UNQUOTE, [form], span)
}
