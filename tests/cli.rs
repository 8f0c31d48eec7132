//! End-to-end tests for the gscores-export binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const LOOKUP_PAGE: &str = r#"<!DOCTYPE html>
<html lang="vi">
<head>
  <title>Tra cứu điểm</title>
  <script>function exportTable() { return "<table id='scores'>"; }</script>
</head>
<body>
  <table id="scores" class="table table-striped">
    <thead>
      <tr><th>Môn</th><th>Điểm</th></tr>
    </thead>
    <tbody>
      <tr>
        <td>Toán</td>
        <td><span class="badge bg-success">  8.75
        </span></td>
      </tr>
      <tr><td>Ngữ Văn, GDCD</td><td>7.5</td></tr>
    </tbody>
  </table>
</body>
</html>
"#;

const EXPECTED_CSV: &str = "\"Môn\",\"Điểm\"\n\"Toán\",\"8.75\"\n\"Ngữ Văn, GDCD\",\"7.5\"";

fn write_page(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("lookup.html");
    fs::write(&path, LOOKUP_PAGE).unwrap();
    path
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("gscores-export").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_exports_to_default_filename() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    cmd()
        .arg(&page)
        .args(["--table", "scores", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let csv = fs::read_to_string(out.join("export.csv")).unwrap();
    assert_eq!(csv, EXPECTED_CSV);
}

#[test]
fn test_stdout_output() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());

    cmd()
        .arg(&page)
        .args(["-t", "scores", "--stdout"])
        .assert()
        .success()
        .stdout(EXPECTED_CSV);
}

#[test]
fn test_missing_table_is_silent() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    cmd()
        .arg(&page)
        .args(["-t", "missing-id", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_missing_table_strict() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());

    cmd()
        .arg(&page)
        .args(["-t", "missing-id", "--stdout", "--strict"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("table not found: #missing-id"));
}

#[test]
fn test_second_export_is_renamed() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());

    for _ in 0..2 {
        cmd()
            .arg(&page)
            .args(["-t", "scores", "-f", "diem.csv", "-o"])
            .arg(dir.path())
            .assert()
            .success();
    }

    assert_eq!(fs::read_to_string(dir.path().join("diem.csv")).unwrap(), EXPECTED_CSV);
    assert_eq!(
        fs::read_to_string(dir.path().join("diem (1).csv")).unwrap(),
        EXPECTED_CSV
    );
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path());

    cmd()
        .arg(&page)
        .args(["-t", "scores", "--stdout", "--report", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"status\": \"exported\""))
        .stderr(predicate::str::contains("\"rows\": 3"));
}

#[test]
fn test_json_input_from_stdin() {
    cmd()
        .args(["-", "-t", "stats", "--stdout"])
        .write_stdin(r#"{"stats": [["Mức", "Số lượng"], [">= 8", 1204], ["< 4", null]]}"#)
        .assert()
        .success()
        .stdout("\"Mức\",\"Số lượng\"\n\">= 8\",\"1204\"\n\"< 4\",\"\"");
}

#[test]
fn test_escaped_quote_style() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    fs::write(&path, r#"{"t": [["5\" floppy", "x"]]}"#).unwrap();

    cmd()
        .arg(&path)
        .args(["-t", "t", "--stdout"])
        .assert()
        .success()
        .stdout("\"5\" floppy\",\"x\"");

    cmd()
        .arg(&path)
        .args(["-t", "t", "--stdout", "--quote-style", "escaped"])
        .assert()
        .success()
        .stdout("\"5\"\" floppy\",\"x\"");
}

#[test]
fn test_unreadable_input_fails() {
    let dir = tempdir().unwrap();

    cmd()
        .arg(dir.path().join("nope.html"))
        .args(["-t", "scores", "--stdout"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load document"));
}
