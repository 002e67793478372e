//! Runs every script under tests/scripts through the script test runner.

use quasi::testing::{TestDiscoverer, TestRunner};

const SCRIPT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scripts");

#[test]
fn scripts_are_discovered() {
    let files = TestDiscoverer::discover_test_files(SCRIPT_DIR).unwrap();
    assert!(files.len() >= 4, "found only {files:?}");
}

#[test]
fn all_script_tests_pass() {
    let summary = TestRunner::run_directory(SCRIPT_DIR).unwrap();

    for (file, error) in &summary.file_errors {
        eprintln!("{file}: {error}");
    }
    for result in summary.results.iter().filter(|r| !r.passed()) {
        if let Err(error) = &result.outcome {
            eprintln!("{} :: {}: {error}", result.file, result.name);
        }
    }

    assert!(summary.passed() > 0);
    assert!(summary.is_success());
}
