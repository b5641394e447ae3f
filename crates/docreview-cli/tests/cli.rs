use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

fn write_sheet(path: &Path, header: &str, values: &[&str]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, header).unwrap();
    for (i, value) in values.iter().enumerate() {
        sheet.write_string(i as u32 + 1, 0, *value).unwrap();
    }
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, workbook.save_to_buffer().unwrap()).unwrap();
}

/// `sager/` with one granted, one refused and one broken case folder, plus a template
/// folder the case-number filter skips.
fn case_tree() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("temp dir");
    let root = tmp.path().join("sager");
    let column = "Gives der aktindsigt?";
    write_sheet(&root.join("GEO-2024-000001/Aktliste.xlsx"), column, &["Ja", "Ja"]);
    write_sheet(&root.join("GEO-2024-000002/Aktliste.xlsx"), column, &["Nej"]);
    write_sheet(&root.join("GEO-2024-000003/Aktliste.xlsx"), "Beslutning", &["Ja"]);
    write_sheet(&root.join("Skabeloner/Aktliste.xlsx"), column, &["Ja"]);
    tmp
}

fn docreview(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docreview"))
        .arg("/sager")
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run docreview")
}

#[test]
fn json_report_for_case_folders() {
    let tmp = case_tree();
    let output = docreview(tmp.path(), &["--case-numbers", "--format", "json"]);
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["root"], "/sager");
    assert_eq!(report["key"], "path");
    assert_eq!(
        report["results"],
        serde_json::json!({
            "/sager/GEO-2024-000001": "full_grant",
            "/sager/GEO-2024-000002": "rejected",
            "/sager/GEO-2024-000003": "column_missing",
        })
    );
    assert_eq!(report["counts"]["column_missing"], 1);
    assert_eq!(report["counts"]["processing_error"], 0);
}

#[test]
fn name_keys_and_unfiltered_walk() {
    let tmp = case_tree();
    let output = docreview(tmp.path(), &["--key", "name", "--format", "json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["filter"], serde_json::Value::Null);
    assert_eq!(report["results"]["Skabeloner"], "full_grant");
    assert_eq!(report["results"]["GEO-2024-000002"], "rejected");
}

#[test]
fn custom_column_and_tokens() {
    let tmp = case_tree();
    let output = docreview(
        tmp.path(),
        &[
            "--case-numbers",
            "--column",
            "Beslutning",
            "--affirmative",
            "Ja",
            "--format",
            "json",
        ],
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"]["/sager/GEO-2024-000003"], "full_grant");
    assert_eq!(report["results"]["/sager/GEO-2024-000001"], "column_missing");
}

#[test]
fn text_report_written_to_file() {
    let tmp = case_tree();
    let out = tmp.path().join("rapporter/aktindsigt.txt");
    let output = docreview(
        tmp.path(),
        &["--name-pattern", "^GEO-2024-00000[12]$", "--output", out.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("/sager/GEO-2024-000001  full access granted"), "{text}");
    assert!(text.contains("/sager/GEO-2024-000002  access refused"), "{text}");
    assert!(!text.contains("GEO-2024-000003"), "{text}");
}

#[test]
fn strict_mode_fails_on_problem_spreadsheets() {
    let tmp = case_tree();
    assert!(docreview(tmp.path(), &["--case-numbers"]).status.success());

    let output = docreview(tmp.path(), &["--case-numbers", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    // The report is still produced.
    assert!(String::from_utf8_lossy(&output.stdout).contains("decision column missing"));
}

#[test]
fn missing_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let output = docreview(tmp.path(), &[]);
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("not found"),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_name_pattern_is_rejected() {
    let tmp = case_tree();
    let output = docreview(tmp.path(), &["--name-pattern", "(unclosed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--name-pattern"));
}

#[test]
fn closed_stdout_is_not_an_error() {
    let tmp = case_tree();
    let mut child = Command::new(env!("CARGO_BIN_EXE_docreview"))
        .arg("/sager")
        .arg("--dir")
        .arg(tmp.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn docreview");

    drop(child.stdout.take());

    let output = child.wait_with_output().expect("wait for docreview");
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
