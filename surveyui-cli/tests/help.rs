use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("surveyui");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("surveyui"));
}

#[test]
fn prints_sample_definition() {
    let mut cmd = cargo::cargo_bin_cmd!("surveyui");
    cmd.arg("--print-sample")
        .assert()
        .success()
        .stdout(contains("\"pages\""));
}
