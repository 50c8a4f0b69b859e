use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write test file");
}

#[test]
fn valid_document_prints_ok() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.jc");
    write_file(&input, "{\"name\": \"Ada\", \"age\": (Integer)37}");

    cargo_bin_cmd!("jsoncast")
        .arg(&input)
        .assert()
        .success()
        .stdout("ok\n")
        .stderr("");
}

#[test]
fn reads_stdin_with_dash() {
    cargo_bin_cmd!("jsoncast")
        .arg("-")
        .args(["--root", "Integer"])
        .write_stdin("  42  \n")
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn outline_of_untyped_object() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.jc");
    write_file(&input, "{\"name\": \"Ada\",\n  age: (Integer)37\n}");

    cargo_bin_cmd!("jsoncast")
        .arg(&input)
        .arg("--outline")
        .assert()
        .success()
        .stdout("null (2 keys)\n  name: String \"Ada\"\n  age: Integer 37\n");
}

#[test]
fn outline_of_cast_root_list() {
    cargo_bin_cmd!("jsoncast")
        .arg("--outline")
        .write_stdin("(Integer)[1, 2]")
        .assert()
        .success()
        .stdout("List<> (2 items)\n  - Integer 1\n  - Integer 2\n");
}

#[test]
fn root_type_applies_to_bare_value() {
    cargo_bin_cmd!("jsoncast")
        .args(["--root", "Integer", "--outline"])
        .write_stdin("7")
        .assert()
        .success()
        .stdout("Integer 7\n");
}

#[test]
fn unknown_cast_fails_with_line() {
    cargo_bin_cmd!("jsoncast")
        .write_stdin("{\n  a: (Bogus)1\n}")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Class 'Bogus' not found. (:2)"));
}

#[test]
fn unterminated_object_fails() {
    cargo_bin_cmd!("jsoncast")
        .write_stdin("{\"a\": 1")
        .assert()
        .failure()
        .stderr(contains("End of file without end of object."));
}

#[test]
fn unknown_root_type_fails() {
    cargo_bin_cmd!("jsoncast")
        .args(["--root", "Shape"])
        .write_stdin("1")
        .assert()
        .failure()
        .stderr(contains("Type name Shape not found."));
}

#[test]
fn warning_level_reports_odd_quotes() {
    cargo_bin_cmd!("jsoncast")
        .args(["--debug", "warning"])
        .write_stdin("{\"a\": \"x\ny\"}")
        .assert()
        .success()
        .stdout("ok\n")
        .stderr(contains("odd number of quotation marks").and(contains("field not found")));
}

#[test]
fn simple_level_stays_quiet() {
    cargo_bin_cmd!("jsoncast")
        .write_stdin("{\"a\": \"x\ny\"}")
        .assert()
        .success()
        .stderr("");
}

#[test]
fn info_level_reports_casts() {
    cargo_bin_cmd!("jsoncast")
        .args(["--debug", "info"])
        .write_stdin("{a: (Integer)1}")
        .assert()
        .success()
        .stderr(contains("cast resolved").and(contains("param set")));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    cargo_bin_cmd!("jsoncast")
        .arg(dir.path().join("missing.jc"))
        .assert()
        .failure()
        .stderr(contains("ERROR"));
}
