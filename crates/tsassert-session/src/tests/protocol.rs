use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn transform_request_dispatches_to_session_transform() {
    let dir = tempdir().unwrap();
    let source_path = dir.path().join("mod.ts");
    fs::write(&source_path, "export function f(x: string) { return x; }").unwrap();
    let mut session = ProjectSession::open(None).expect("open");

    let request = Request { command: Command::Transform, path: source_path.display().to_string(), flavor: Default::default() };
    let response = handle_request(&mut session, &request);

    assert!(response.code.is_some());
    assert!(response.error.is_none());
}

#[test]
fn analyze_request_dispatches_to_session_analyze() {
    let dir = tempdir().unwrap();
    let source_path = dir.path().join("mod.ts");
    fs::write(&source_path, "export function f(x: string) { return x; }").unwrap();
    let mut session = ProjectSession::open(None).expect("open");

    let request = Request { command: Command::Analyze, path: source_path.display().to_string(), flavor: Default::default() };
    let response = handle_request(&mut session, &request);

    assert!(response.items.is_some());
    assert_eq!(response.items.unwrap().len(), 1);
}

#[test]
fn close_request_closes_the_session() {
    let mut session = ProjectSession::open(None).expect("open");
    let request = Request { command: Command::Close, path: String::new(), flavor: Default::default() };

    let response = handle_request(&mut session, &request);

    assert!(response.error.is_none());
    assert!(session.is_closed());
}

#[test]
fn missing_file_becomes_a_project_error_response() {
    let mut session = ProjectSession::open(None).expect("open");
    let request = Request { command: Command::Transform, path: "/nonexistent/path.ts".to_string(), flavor: Default::default() };

    let response = handle_request(&mut session, &request);

    let error = response.error.expect("error expected");
    assert_eq!(error.code, "project");
}

#[test]
fn request_deserializes_from_camel_case_json() {
    let json = r#"{"command":"transform","path":"a.ts","flavor":"ts"}"#;
    let request: Request = serde_json::from_str(json).expect("deserialize");
    assert_eq!(request.command, Command::Transform);
    assert_eq!(request.path, "a.ts");
}
