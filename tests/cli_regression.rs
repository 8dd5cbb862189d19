// Regression tests for the lamina CLI surface: exit codes, diagnostics,
// and normalize output.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

use lamina::compiler::compile_astro;
use lamina::{BodyNode, ImportSpec, LayoutBlueprint};

fn sample_layout() -> String {
    let mut blueprint = LayoutBlueprint::new("Sample");
    blueprint.imports = vec![ImportSpec::new("Header", "./Header.astro")];
    blueprint.pre_content = vec![BodyNode::component("Header")];
    compile_astro(&blueprint)
}

#[test]
fn validate_accepts_a_compiled_layout() {
    let path = "tests/cli_valid_layout.astro";
    fs::write(path, sample_layout()).unwrap();

    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("validate").arg(path);
    cmd.assert().success().stdout(contains("OK"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_rejects_a_layout_without_a_slot() {
    let path = "tests/cli_slotless_layout.astro";
    fs::write(path, sample_layout().replace("<slot />", "")).unwrap();

    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("validate").arg(path);
    cmd.assert()
        .failure()
        .stdout(contains("exactly one"))
        .stderr(contains("lamina::validate"));

    let _ = fs::remove_file(path);
}

#[test]
fn parse_prints_blueprint_json() {
    let path = "tests/cli_parse_layout.astro";
    fs::write(path, sample_layout()).unwrap();

    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("parse").arg(path);
    cmd.assert()
        .success()
        .stdout(contains("\"imports\"").and(contains("Header.astro")));

    let _ = fs::remove_file(path);
}

#[test]
fn parse_reports_unrecognized_files_with_a_diagnostic() {
    let path = "tests/cli_not_a_layout.astro";
    fs::write(path, "<p>just a component</p>").unwrap();

    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("parse").arg(path);
    cmd.assert().failure().stderr(
        contains("lamina::parse")
            .or(contains("not a blueprint-compatible"))
            .or(contains("help:")),
    );

    let _ = fs::remove_file(path);
}

#[test]
fn normalize_emits_the_identical_text_for_compiled_input() {
    let path = "tests/cli_normalize_layout.astro";
    let text = sample_layout();
    fs::write(path, &text).unwrap();

    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("normalize").arg(path);
    cmd.assert().success().stdout(text);

    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_fails_with_read_diagnostic() {
    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.arg("validate").arg("tests/does_not_exist.astro");
    cmd.assert().failure().stderr(contains("lamina::io::read"));
}
