#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

const SAMPLE_ICS: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nDTSTART:20250301T100000\r\nSUMMARY:Anatomie\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_reports_window_validation_errors() {
    run_cli("window dates 2025-06-10 2025-06-01\nquit\n")
        .success()
        .stdout(str_contains("must be on or before"));
}

#[test]
fn cli_rejects_unknown_method() {
    run_cli("method set cramming\nquit\n")
        .success()
        .stdout(str_contains("Unknown revision method 'cramming'"));
}

#[test]
fn cli_import_and_generate_flow() {
    let ics = NamedTempFile::new().expect("create temp file");
    std::fs::write(ics.path(), SAMPLE_ICS).expect("write calendar");
    let path = ics.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "import {}\nmethod set leitner\ngenerate\nquit\n",
        path
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Imported 1 event(s)"))
        .stdout(str_contains("Generated (events=1, sessions=5)"))
        .stdout(str_contains("Anatomie"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let ics = NamedTempFile::new().expect("create temp file");
    std::fs::write(ics.path(), SAMPLE_ICS).expect("write calendar");
    let ics_path = ics.path().to_string_lossy().replace('\\', "\\\\");

    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "import {}\nmethod set leitner\ngenerate\nsave json {}\nwindow dates 2026-01-01 2026-12-31\ngenerate\nload json {}\nshow\nquit\n",
        ics_path, path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Plan loaded from"),
        "expected output to mention load completion:\n{}",
        output
    );
    let after_reload = output.split("Plan loaded from").last().unwrap_or_default();
    assert!(
        after_reload.contains("2025-03-02 10:00:00"),
        "reloaded plan should show the persisted sessions:\n{}",
        after_reload
    );
}

#[test]
fn cli_lists_methods() {
    run_cli("method list\nquit\n")
        .success()
        .stdout(str_contains("spaced_square"))
        .stdout(str_contains("Méthode des J"));
}
