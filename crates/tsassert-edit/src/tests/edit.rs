use tsassert_common::Span;
use tsassert_flow::{Decision, SiteKind};
use tsassert_planner::{CandidateSite, ReferenceStub};
use tsassert_synth::{Fragment, HoistedHelper};

use super::*;

fn site(kind: SiteKind, byte_span: Span, insertion: Span, name: &str, fragment: Option<Fragment>) -> CandidateSite {
    let decision = if fragment.is_some() { Decision::validate() } else { Decision::skip("test") };
    CandidateSite { kind, byte_span, insertion, name: name.to_string(), expected_type: None, decision, fragment }
}

fn fragment(expr: &str) -> Fragment {
    Fragment { expr: expr.to_string(), new_helpers: Vec::new() }
}

fn options() -> ApplyOptions {
    ApplyOptions {
        generated_file: "out.js".to_string(),
        source_file: "in.ts".to_string(),
        include_content: true,
        inline: false,
    }
}

#[test]
fn parameter_with_block_body_inserts_a_statement() {
    let source = "function f(x) {\n  return x;\n}\n";
    let brace = source.find('{').unwrap() as u32;
    let insertion = Span::at(brace + 1);
    let sites = vec![site(SiteKind::Parameter, Span::new(11, 12), insertion, "x", Some(fragment("_checkX")))];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert!(applied.code.contains("x = (_checkX)(x, \"x\");"));
    assert!(applied.code.contains("return x;"));
}

#[test]
fn parameter_with_expression_body_wraps_with_comma_operator() {
    let source = "const f = (x) => x + 1;";
    let body_start = source.find("x + 1").unwrap() as u32;
    let insertion = Span::new(body_start, body_start + "x + 1".len() as u32);
    let sites = vec![site(SiteKind::Parameter, Span::new(11, 12), insertion, "x", Some(fragment("_checkX")))];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert_eq!(applied.code, "const f = (x) => ((_checkX)(x, \"x\"), x + 1);");
}

#[test]
fn return_site_wraps_original_expression() {
    let source = "function f() { return g(); }";
    let start = source.find("g()").unwrap() as u32;
    let span = Span::new(start, start + 3);
    let sites = vec![site(SiteKind::Return, span, span, "return", Some(fragment("_checkRet")))];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert_eq!(applied.code, "function f() { return (_checkRet)(g(), \"return\"); }");
}

#[test]
fn cast_site_wraps_original_expression() {
    let source = "const v = x as Foo;";
    let start = source.find('x').unwrap() as u32;
    let span = Span::new(start, start + 1);
    let sites = vec![site(SiteKind::Cast, span, span, "as", Some(fragment("_checkFoo")))];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert_eq!(applied.code, "const v = (_checkFoo)(x, \"as\") as Foo;");
}

#[test]
fn json_stringify_site_replaces_the_whole_call() {
    let source = "const s = JSON.stringify(payload);";
    let start = source.find("JSON.stringify").unwrap() as u32;
    let span = Span::new(start, source.len() as u32 - 1);
    let sites = vec![site(SiteKind::JsonStringify, span, span, "JSON.stringify", Some(fragment("_stringifyPayload")))];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert_eq!(applied.code, "const s = (_stringifyPayload)(payload);");
}

#[test]
fn skipped_sites_produce_no_edit() {
    let source = "function f(x) { return x; }";
    let sites = vec![site(SiteKind::Parameter, Span::new(11, 12), Span::at(15), "x", None)];

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();

    assert_eq!(applied.code, source);
}

#[test]
fn overlapping_sites_are_rejected() {
    let source = "const v = x as Foo;";
    let span = Span::new(10, 11);
    let sites = vec![
        site(SiteKind::Cast, span, span, "as", Some(fragment("_checkFoo"))),
        site(SiteKind::Cast, Span::new(10, 12), Span::new(10, 12), "as", Some(fragment("_checkBar"))),
    ];

    let result = apply_edits(source, &sites, &[], &options());
    assert!(result.is_err());
}

#[test]
fn hoisted_helpers_and_reference_stubs_are_prepended() {
    let source = "function f(x) { return x; }";
    let mut frag = fragment("_checkX");
    frag.new_helpers.push(HoistedHelper { name: "_checkX".to_string(), source: "const _checkX = (v, p) => true;".to_string() });
    let sites = vec![site(SiteKind::Parameter, Span::new(11, 12), Span::at(15), "x", Some(frag))];
    let stubs = vec![ReferenceStub { name: "_checkRef_0".to_string(), source: "const _checkRef_0 = (v, p) => true;".to_string() }];

    let applied = apply_edits(source, &sites, &stubs, &options()).unwrap();

    let helper_pos = applied.code.find("const _checkX").unwrap();
    let stub_pos = applied.code.find("const _checkRef_0").unwrap();
    let call_pos = applied.code.find("(_checkX)(x").unwrap();
    assert!(helper_pos < call_pos);
    assert!(stub_pos < call_pos);
}

#[test]
fn source_map_records_one_source_with_matching_content() {
    let source = "function f(x) { return x; }";
    let sites: Vec<CandidateSite> = Vec::new();

    let applied = apply_edits(source, &sites, &[], &options()).unwrap();
    let map = applied.source_map.expect("source map requested");

    assert_eq!(map.sources, vec!["in.ts"]);
    assert_eq!(map.sources_content.as_ref().unwrap()[0], source);
}

#[test]
fn inline_mode_appends_a_data_url_comment_and_skips_the_separate_map() {
    let source = "const x = 1;\n";
    let mut opts = options();
    opts.inline = true;
    let sites: Vec<CandidateSite> = Vec::new();

    let applied = apply_edits(source, &sites, &[], &opts).unwrap();

    assert!(applied.source_map.is_none());
    assert!(applied.code.contains("//# sourceMappingURL=data:application/json;base64,"));
}
