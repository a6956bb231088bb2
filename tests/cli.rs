use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TABLE: &str = "\
date_1;int_2;str_3;float_4;float_5;string_6
12.08.1978;1;row1;1000;;hello
12.08.1978;1;row2;500;0.03;
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn framediff() -> Command {
    Command::cargo_bin("framediff").unwrap()
}

fn xlsx_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "xlsx"))
        .collect()
}

#[test]
fn identical_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", TABLE);

    framediff()
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("are identical"));
}

#[test]
fn single_difference_is_counted_and_saved() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", &TABLE.replace("hello", "hell-o"));

    framediff()
        .arg(&a)
        .arg(&b)
        .arg("--save")
        .assert()
        .success()
        .stdout(predicate::str::contains("They are NOT identical."))
        .stdout(predicate::str::contains("string_6"))
        .stdout(predicate::str::contains("Output saved to:"));

    let saved = xlsx_files(dir.path());
    assert_eq!(saved.len(), 1);
    let name = saved[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("framediff_diff_output_"));
}

#[test]
fn unanswered_save_prompt_defaults_to_no() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", &TABLE.replace("hello", "hell-o"));

    framediff()
        .arg(&a)
        .arg(&b)
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("[y/n]"));

    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn missing_path_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);

    framediff()
        .arg(&a)
        .arg(dir.path().join("missing.csv"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn unknown_index_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", TABLE);

    framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["-i", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("column 'nope' not found"));
}

#[test]
fn duplicate_index_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", TABLE);

    framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["-i", "date_1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate values"));
}

#[test]
fn mixed_formats_are_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.json", "[]");

    framediff()
        .arg(&a)
        .arg(&b)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file format mismatch"));
}

#[test]
fn column_mismatch_drop() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", "id,a,b\n1,x,1\n2,y,2\n");
    let b = write(&dir, "b.csv", "id,a,c\n1,x,1\n2,z,2\n");

    framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["--columns", "drop", "--no-save", "-i", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found differences in the columns"))
        .stdout(predicate::str::contains("  - b"))
        .stdout(predicate::str::contains("  - c"))
        .stdout(predicate::str::contains("shape (2, 1)"));
}

#[test]
fn column_mismatch_force() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", "a,b\n1,2\n");
    let b = write(&dir, "b.csv", "x,y\n1,2\n");

    framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["--columns", "force", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("They are identical."));
}

#[test]
fn json_summary() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", "id,v\n1,10\n2,20\n3,30\n");
    let b = write(&dir, "b.csv", "id,v\n1,10\n2,21\n");

    let output = framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["-i", "id", "--format", "json", "--no-save"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["shape"], serde_json::json!([2, 1]));
    assert_eq!(summary["verdict"]["status"], "not_identical");
    assert_eq!(summary["verdict"]["differences"], 1);
    let events: Vec<&str> = summary["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"].as_str().unwrap())
        .collect();
    assert_eq!(events, vec!["loaded", "loaded", "rows_dropped", "compared"]);
}

#[test]
fn single_column_file_can_be_aborted() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", "only\n1\n2\n");
    let b = write(&dir, "b.csv", "only\n1\n2\n");

    framediff()
        .arg(&a)
        .arg(&b)
        .write_stdin("n\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("only one column"));
}

#[test]
fn invalid_load_param_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", TABLE);
    let b = write(&dir, "b.csv", TABLE);

    framediff()
        .args([a.as_os_str(), b.as_os_str()])
        .args(["-l", "encoding=latin1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid load parameter"));
}

#[test]
fn extra_csv_fields_are_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.csv", "a,b\n1,2,3\n4,5,6\n");
    let b = write(&dir, "b.csv", "a,b\n1,2\n4,5\n");

    framediff()
        .arg(&a)
        .arg(&b)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 2: expected 2 fields, found 3"));
}
