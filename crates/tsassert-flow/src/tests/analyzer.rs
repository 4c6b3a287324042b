use super::*;
use tsassert_syntax::{parse, NodeKind};

fn parse_fn(src: &str) -> (tsassert_syntax::ParsedFile, NodeIndex) {
    let parsed = parse(src).expect("parse");
    let fn_idx = *parsed
        .arena
        .children(parsed.root)
        .iter()
        .find(|&&n| parsed.arena.kind(n) == NodeKind::FunctionDeclaration)
        .expect("function declaration");
    (parsed, fn_idx)
}

#[test]
fn returning_a_parameter_directly_is_dirty() {
    let (parsed, fn_idx) = parse_fn("function f(x: string) { return x; }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns.len(), 1);
    assert_eq!(analysis.returns[0].1, Fact::Dirty);
}

#[test]
fn returning_json_parse_result_is_clean() {
    let (parsed, fn_idx) = parse_fn("function f(s: string) { return JSON.parse(s); }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Clean);
}

#[test]
fn returning_a_variable_reassigned_from_json_parse_is_clean() {
    let (parsed, fn_idx) = parse_fn("function f(s: string) { const v = JSON.parse(s); return v; }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Clean);
}

#[test]
fn mutating_a_clean_binding_dirties_it_before_return() {
    let (parsed, fn_idx) = parse_fn("function f(s: string) { let v = JSON.parse(s); v = s; return v; }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Dirty);
}

#[test]
fn passing_a_clean_binding_to_an_opaque_call_escapes_it() {
    let (parsed, fn_idx) = parse_fn("function f(s: string) { const v = JSON.parse(s); mutate(v); return v; }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Escaped);
}

#[test]
fn property_access_on_clean_object_is_clean() {
    let (parsed, fn_idx) = parse_fn("function f(s: string) { const v = JSON.parse(s); return v.name; }");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Clean);
}

#[test]
fn if_else_join_keeps_the_more_pessimistic_branch() {
    let (parsed, fn_idx) = parse_fn(
        "function f(s: string, flag: boolean) { let v = JSON.parse(s); if (flag) { v = s; } else { } return v; }",
    );
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Dirty);
}

#[test]
fn await_after_escape_reverts_to_dirty() {
    let (parsed, fn_idx) = parse_fn(
        "async function f(s: string) { const v = JSON.parse(s); mutate(v); return await v; }",
    );
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Dirty);
}

#[test]
fn arrow_expression_body_is_analyzed_directly() {
    let parsed = parse("const f = (s: string) => JSON.parse(s);").expect("parse");
    let stmt = parsed.arena.children(parsed.root)[0];
    let decl = parsed.arena.children(stmt)[0];
    let fn_idx = parsed.arena.initializer_of(decl).expect("initializer");
    let analysis = EscapeAnalyzer::new(&parsed.arena).analyze_function(fn_idx);
    assert_eq!(analysis.returns[0].1, Fact::Clean);
}
