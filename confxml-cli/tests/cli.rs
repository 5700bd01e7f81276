use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn convert_file_to_xml() {
    let file = config_file("\\ server\nlet PORT = 8080;\n$[host: q(localhost), port: |PORT + 1|]\n");
    let mut cmd = cargo_bin_cmd!("confxml");
    cmd.arg(file.path()).env_remove("RUST_LOG");

    let output_pred = predicate::str::starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#)
        .and(predicate::str::contains("<host>localhost</host>"))
        .and(predicate::str::contains("<port>8081</port>"));

    cmd.assert().success().stdout(output_pred).stderr("");
}

#[test]
fn convert_stdin_to_compact_xml() {
    let mut cmd = cargo_bin_cmd!("confxml");
    cmd.arg("--compact").arg("--root").arg("settings");
    cmd.write_stdin("{1, q(two)}");

    cmd.assert().success().stdout(predicate::str::contains(
        r#"<settings><items><item index="0">1</item><item index="1">two</item></items></settings>"#,
    ));
}

#[test]
fn print_resolved_configuration() {
    let mut cmd = cargo_bin_cmd!("confxml");
    cmd.arg("--format").arg("conf").arg("--compact");
    cmd.write_stdin("let A = -3;\n$[v: |abs(A)|, w: {q(x)}]");

    cmd.assert()
        .success()
        .stdout("$[v: 3, w: {q(x)}]\n");
}

#[test]
fn invalid_input_reports_error() {
    let mut cmd = cargo_bin_cmd!("confxml");
    cmd.write_stdin("$[v: q(abc]");

    cmd.assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("ERROR: Unclosed string"));
}

#[test]
fn missing_file_reports_error() {
    let mut cmd = cargo_bin_cmd!("confxml");
    cmd.arg("does/not/exist.conf");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ERROR: failed to read does/not/exist.conf"));
}
