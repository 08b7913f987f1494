use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;

#[test]
fn eval_prints_output() {
    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.args(["-e", "x = [10, 20, 30]\nrintperb x[3]\nrintperb 4 / 2"]);
    cmd.assert().success().stdout("30\n2.0\n");
}

#[test]
fn runs_a_source_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "hingterb Position\n  rgaerb x\n  rgaerb y\nndeerb\nrintperb ewnerb Position [100, 200]\n"
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.arg(file.path());
    cmd.assert()
        .success()
        .stdout("Position { x: 100, y: 200 }\n");
}

#[test]
fn runtime_error_fails_after_earlier_output() {
    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.args(["-e", "rintperb 30\nrintperb 1 / 0\nrintperb 40"]);
    cmd.assert()
        .failure()
        .stdout("30\n")
        .stderr(contains("Division by zero"));
}

#[test]
fn syntax_error_is_reported() {
    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.args(["-e", "rintperb 1\nx = )"]);
    cmd.assert()
        .failure()
        .stdout("")
        .stderr(contains("Expected an expression").and(contains("<eval>")));
}

#[test]
fn dump_ast_prints_the_parsed_program() {
    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.args(["-e", "rintperb 1 + 2 * 3", "--dump-ast"]);
    cmd.assert().success().stdout("rintperb (1 + (2 * 3))\n");
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("ferb-lang-runner").unwrap();
    cmd.arg(dir.path().join("missing.ferb"));
    cmd.assert().failure().stderr(contains("Failed to read"));
}
