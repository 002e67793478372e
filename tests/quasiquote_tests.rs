//! Quasiquote: template rewriting, `unquote` escapes at any depth, and the
//! reader shorthands.

mod common;

use common::{eval, eval_err};
use quasi::macros::quasiquote_expand;
use quasi::syntax::parse_one;
use quasi::{to_error_source, ErrorType};

fn qq(src: &str) -> String {
    let source = to_error_source("qq", src);
    quasiquote_expand(&parse_one(src, &source).unwrap()).to_string()
}

#[test]
fn template_without_unquote_matches_quote() {
    assert_eq!(eval("(= `(1 2 3) '(1 2 3))"), "true");
    assert_eq!(eval("`(1 2 3)"), "(1 2 3)");
    assert_eq!(eval("`(a (b c) \"d\")"), "(a (b c) \"d\")");
}

#[test]
fn unquote_evaluates_in_the_current_scope() {
    assert_eq!(eval("(def a 5) `(1 ,a 3)"), "(1 5 3)");
    assert_eq!(eval("(let (a 7) `(1 ,a 3))"), "(1 7 3)");
}

#[test]
fn nested_unquote_is_reached() {
    assert_eq!(eval("(def x 2) `(a (b (c ,x)))"), "(a (b (c 2)))");
    assert_eq!(eval("`(sum ,(+ 1 2))"), "(sum 3)");
}

#[test]
fn scalar_templates() {
    assert_eq!(eval("`a"), "a");
    assert_eq!(eval("`()"), "()");
    assert_eq!(eval("(def a 5) `,a"), "5");
}

#[test]
fn rewrite_shape() {
    assert_eq!(qq("x"), "(quote x)");
    assert_eq!(qq("(unquote y)"), "y");
    assert_eq!(qq("(a)"), "(cons (quote a) (quote ()))");
    assert_eq!(
        qq("(a (unquote b) c)"),
        "(cons (quote a) (cons b (cons (quote c) (quote ()))))"
    );
}

#[test]
fn quasiquote_special_form_equals_reader_shorthand() {
    assert_eq!(eval("(def a 1) (= (quasiquote (x (unquote a))) `(x ,a))"), "true");
}

#[test]
fn nested_if_template_evaluates_to_one() {
    let src = r#"
        (defmacro my-if (fn (c t e) `(if ,c ,t ,e)))
        (my-if true (my-if false 0 1) 2)
    "#;
    assert_eq!(eval(src), "1");
}

#[test]
fn macros_inside_unquoted_code_still_expand() {
    let src = r#"
        (defmacro inc (fn (x) `(+ ,x 1)))
        `(result ,(inc 41))
    "#;
    assert_eq!(eval(src), "(result 42)");
}

#[test]
fn unbound_symbol_in_unquote_propagates() {
    assert_eq!(eval_err("`(1 ,missing)"), ErrorType::UnboundSymbol);
}

#[test]
fn quasiquoteexpand_does_not_evaluate() {
    assert_eq!(
        eval("(quasiquoteexpand (1 ,missing))"),
        "(cons (quote 1) (cons missing (quote ())))"
    );
}
