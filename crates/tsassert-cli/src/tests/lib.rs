use std::fs;

use tempfile::tempdir;

use super::*;
use tsassert_session::Flavor;

#[test]
fn run_transform_reports_code_and_source_map() {
    let dir = tempdir().unwrap();
    let source_path = dir.path().join("mod.ts");
    fs::write(&source_path, "export function f(x: string) { return x; }").unwrap();

    let mut session = ProjectSession::open(None).expect("open");
    let report = run_transform(&mut session, &source_path, Flavor::Ts).expect("transform");

    assert_eq!(report.file, source_path.display().to_string());
    assert!(report.code.unwrap().contains("x = ("));
    assert!(report.source_map.is_some());
    assert!(report.items.is_none());
}

#[test]
fn run_analyze_reports_items_without_code() {
    let dir = tempdir().unwrap();
    let source_path = dir.path().join("mod.ts");
    fs::write(&source_path, "export function f(x: string) { return x; }").unwrap();

    let mut session = ProjectSession::open(None).expect("open");
    let report = run_analyze(&mut session, &source_path).expect("analyze");

    assert!(report.code.is_none());
    assert_eq!(report.items.unwrap().len(), 1);
}

#[test]
fn run_transform_on_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.ts");

    let mut session = ProjectSession::open(None).expect("open");
    assert!(run_transform(&mut session, &missing, Flavor::Ts).is_err());
}
