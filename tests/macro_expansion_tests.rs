//! Macro expansion: definition, automatic expansion before evaluation,
//! recursion through the expansion loop, and `macroexpand`.

mod common;

use common::{eval, eval_err};
use quasi::atoms::NullSink;
use quasi::runtime::EvalOptions;
use quasi::{Engine, ErrorType};

#[test]
fn identity_macro_returns_its_argument_unevaluated() {
    assert_eq!(eval("(defmacro m (fn (x) x)) (m 5)"), "5");
    assert_eq!(
        eval("(defmacro id (fn (x) x)) (macroexpand (id (+ 1 2)))"),
        "(+ 1 2)"
    );
}

#[test]
fn macro_arguments_are_not_evaluated() {
    // `undefined-name` would be an unbound symbol if it were evaluated.
    assert_eq!(
        eval("(defmacro ignore (fn (x) ''ignored)) (ignore undefined-name)"),
        "ignored"
    );
}

#[test]
fn atoms_and_non_macro_lists_expand_to_themselves() {
    assert_eq!(eval("(macroexpand 42)"), "42");
    assert_eq!(eval("(macroexpand \"s\")"), "\"s\"");
    assert_eq!(eval("(def f (fn (x) x)) (macroexpand (f 1))"), "(f 1)");
    assert_eq!(eval("(macroexpand ())"), "()");
}

#[test]
fn expansion_repeats_until_head_is_not_a_macro() {
    let src = r#"
        (defmacro inner (fn (x) (list '+ x 1)))
        (defmacro outer (fn (x) (list 'inner x)))
        (list (macroexpand (outer 41)) (outer 41))
    "#;
    assert_eq!(eval(src), "((+ 41 1) 42)");
}

#[test]
fn unless_macro_controls_evaluation_order() {
    let src = r#"
        (defmacro unless (fn (c then else) (list 'if c else then)))
        (list (unless false 1 (/ 1 0)) (unless true (/ 1 0) 2))
    "#;
    assert_eq!(eval(src), "(1 2)");
}

#[test]
fn macros_inside_arguments_expand_when_reached() {
    let src = r#"
        (defmacro twice (fn (x) (list '* 2 x)))
        (+ (twice 3) (twice 4))
    "#;
    assert_eq!(eval(src), "14");
}

#[test]
fn macro_defined_in_scope_is_visible_to_later_siblings() {
    let src = r#"
        (let ()
          (defmacro local-id (fn (x) x))
          (local-id 9))
    "#;
    assert_eq!(eval(src), "9");
    assert_eq!(
        eval_err("(let () (defmacro local-id (fn (x) x))) (local-id 9)"),
        ErrorType::UnboundSymbol
    );
}

#[test]
fn variadic_macros_receive_raw_forms() {
    let src = r#"
        (defmacro my-do (fn (...forms) (cons 'do forms)))
        (macroexpand (my-do (def a 1) (+ a 1)))
    "#;
    assert_eq!(eval(src), "(do (def a 1) (+ a 1))");
    assert_eq!(
        eval("(defmacro my-do (fn (...forms) (cons 'do forms))) (my-do (def a 1) (+ a 1))"),
        "2"
    );
}

#[test]
fn unbound_head_fails_identically_with_or_without_macros() {
    assert_eq!(eval_err("(nope 1 2)"), ErrorType::UnboundSymbol);
    assert_eq!(eval_err("(macroexpand (nope 1 2))"), ErrorType::UnboundSymbol);
}

#[test]
fn errors_raised_by_a_macro_body_propagate_unchanged() {
    assert_eq!(
        eval_err("(defmacro bad (fn (x) (/ x 0))) (bad 1)"),
        ErrorType::Eval
    );
    assert_eq!(
        eval_err("(defmacro bad (fn (x) missing)) (bad 1)"),
        ErrorType::UnboundSymbol
    );
}

#[test]
fn defmacro_requires_a_callable() {
    assert_eq!(eval_err("(defmacro m 1)"), ErrorType::TypeError);
    assert_eq!(eval_err("(defmacro m '(fn (x) x))"), ErrorType::TypeError);
}

#[test]
fn special_form_heads_are_never_expanded() {
    // Binding a macro under a special form's name does not change the form.
    let src = r#"
        (defmacro if (fn (...args) ''hijacked))
        (if true 1 2)
    "#;
    assert_eq!(eval(src), "1");
}

#[test]
fn expansion_limit_guards_runaway_macros() {
    let engine = Engine::with_options(EvalOptions {
        expansion_limit: Some(100),
        trace_expansions: false,
    });
    let err = engine
        .eval_str("(defmacro forever (fn () '(forever))) (forever)")
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Eval);

    assert_eq!(
        engine
            .eval_str("(defmacro inc (fn (x) (list '+ x 1))) (inc 1)")
            .unwrap()
            .to_string(),
        "2"
    );
}

#[test]
fn trace_lists_each_expansion_in_order() {
    let engine = Engine::new();
    let mut sink = NullSink;
    let trace = engine
        .trace_source(
            "trace.lisp",
            "(defmacro a (fn (x) (list 'b x))) (defmacro b (fn (x) x)) (a 1)",
            &mut sink,
        )
        .unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0].input.to_string(), "(a 1)");
    assert_eq!(trace[0].output.to_string(), "(b 1)");
    assert_eq!(trace[1].output.to_string(), "1");
}
