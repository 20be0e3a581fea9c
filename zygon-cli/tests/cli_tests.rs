//! CLI interface end-to-end tests for the `zygon` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn zygon_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_zygon"))
}

#[test]
fn help_output_mentions_usage() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage").or(predicate::str::contains("zygon")));
}

#[test]
fn version_flag_succeeds() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("--version");
    cmd.assert().success();
}

#[test]
fn runs_an_arithmetic_program_successfully() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("run").arg(fixtures_dir().join("arithmetic.zygon"));
    cmd.assert().success();
}

#[test]
fn io_log_writes_interpolated_text_to_stdout() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("run").arg(fixtures_dir().join("greet.zygon"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2+2=4"));
}

#[test]
fn a_parse_error_exits_nonzero_and_prints_a_diagnostic() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("run").arg(fixtures_dir().join("broken.zygon"));
    cmd.assert().failure().stderr(predicate::str::is_empty().not());
}

#[test]
fn a_missing_file_exits_nonzero() {
    let mut cmd = Command::new(zygon_bin());
    cmd.arg("run").arg(fixtures_dir().join("does_not_exist.zygon"));
    cmd.assert().failure();
}

#[test]
fn no_subcommand_prints_usage_and_exits_nonzero() {
    let mut cmd = Command::new(zygon_bin());
    cmd.assert().failure();
}
