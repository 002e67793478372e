// CLI regression tests: commands run end to end and errors are rendered as
// miette diagnostics.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn script(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quasi-cli-{}-{name}", std::process::id()));
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn cli_reports_miette_diagnostics_on_parse_error() {
    let bad_file = script("bad.lisp", "(def x 42");

    let mut cmd = Command::cargo_bin("quasi").unwrap();
    cmd.arg("run").arg(&bad_file);
    cmd.assert()
        .failure()
        .stderr(contains("quasi::parse").or(contains("Parse error")));

    let _ = fs::remove_file(bad_file);
}

#[test]
fn cli_run_prints_last_value() {
    let file = script("run.lisp", "(defmacro m (fn (x) `(+ ,x 1))) (m 41)");

    Command::cargo_bin("quasi")
        .unwrap()
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("42"));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_macroexpand_prints_expansions() {
    let file = script("expand.lisp", "(defmacro id (fn (x) x)) (id (+ 1 2))");

    Command::cargo_bin("quasi")
        .unwrap()
        .arg("macroexpand")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("(+ 1 2)"));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_expansion_limit_flag() {
    let file = script("loop.lisp", "(defmacro f (fn () '(f))) (f)");

    Command::cargo_bin("quasi")
        .unwrap()
        .args(["--expansion-limit", "5", "run"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("expansion limit"));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_ast_emits_json() {
    let file = script("ast.lisp", "'a");

    Command::cargo_bin("quasi")
        .unwrap()
        .arg("ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("\"Symbol\": \"quote\""));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_macrotrace_diffs_words_within_a_step() {
    let file = script(
        "trace.lisp",
        "(defmacro my-if (fn (c a b) `(if ,c ,a ,b))) (my-if true 1 2)",
    );

    Command::cargo_bin("quasi")
        .unwrap()
        .arg("macrotrace")
        .arg(&file)
        .assert()
        .success()
        .stdout(
            contains("Step 1: my-if")
                .and(contains("[-(my-if-]"))
                .and(contains("{+(if+}"))
                .and(contains("true 1 2)")),
        );

    let _ = fs::remove_file(file);
}
