use super::*;
use tsassert_common::ReusableValidators;
use tsassert_syntax::parse;

fn opts() -> PlannerOptions {
    PlannerOptions {
        ignored: Default::default(),
        policy: ReusableValidators::Auto,
        max_generated_functions: None,
        validate_casts: true,
    }
}

fn plan(src: &str) -> PlanResult {
    let parsed = parse(src).expect("parse");
    let mut planner = SitePlanner::new(&parsed, opts());
    planner.plan().expect("plan")
}

#[test]
fn exported_function_parameter_always_validates() {
    let result = plan("export function f(x: string) {}");
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(param.is_validated());
    assert!(param.fragment.is_some());
}

#[test]
fn internal_function_with_only_clean_call_sites_skips_parameter() {
    let result = plan(
        "function f(x: string) { return x; } \
         f(JSON.parse(raw)); f(\"literal\");",
    );
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(!param.is_validated());
    assert!(param.fragment.is_none());
}

#[test]
fn internal_function_with_one_dirty_call_site_still_validates() {
    let result = plan(
        "function f(x: string) { return x; } \
         f(JSON.parse(raw)); f(other);",
    );
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(param.is_validated());
}

#[test]
fn unconstrained_generic_parameter_is_skipped() {
    let result = plan("export function f<T>(x: T) {}");
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(!param.is_validated());
    assert!(param.expected_type.is_none());
}

#[test]
fn constrained_generic_parameter_validates_against_constraint() {
    let result = plan("export function f<T extends string>(x: T) {}");
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(param.is_validated());
    assert!(param.expected_type.is_some());
}

#[test]
fn return_of_dirty_expression_validates() {
    let result = plan("export function f(x: string): string { return x; }");
    let ret = result.sites.iter().find(|s| s.kind == SiteKind::Return).expect("return site");
    assert!(ret.is_validated());
}

#[test]
fn return_of_clean_expression_skips() {
    let result = plan("export function f(s: string): unknown { return JSON.parse(s); }");
    let ret = result.sites.iter().find(|s| s.kind == SiteKind::Return).expect("return site");
    assert!(!ret.is_validated());
}

#[test]
fn return_cast_coalesces_into_a_single_return_site_on_the_cast_target() {
    let result = plan("export function f(x: unknown): string { return x as string; }");
    let returns: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::Return).collect();
    let casts: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::Cast).collect();
    assert_eq!(returns.len(), 1);
    assert_eq!(casts.len(), 0, "the cast must not also produce a separate Cast site");
}

#[test]
fn plain_cast_produces_a_cast_site() {
    let result = plan("const v = (x as string);");
    let casts: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::Cast).collect();
    assert_eq!(casts.len(), 1);
    assert!(casts[0].is_validated());
}

#[test]
fn cast_wrapping_json_parse_becomes_a_json_parse_site_not_a_cast_site() {
    let result = plan("const v = JSON.parse(raw) as string;");
    let casts: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::Cast).collect();
    let parses: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::JsonParse).collect();
    assert_eq!(casts.len(), 0);
    assert_eq!(parses.len(), 1);
    assert!(parses[0].is_validated());
}

#[test]
fn declarator_typed_json_parse_produces_a_site() {
    let result = plan("const v: string = JSON.parse(raw);");
    let parses: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::JsonParse).collect();
    assert_eq!(parses.len(), 1);
}

#[test]
fn untyped_bare_json_parse_produces_no_site() {
    let result = plan("const v = JSON.parse(raw);");
    let parses: Vec<_> = result.sites.iter().filter(|s| s.kind == SiteKind::JsonParse).collect();
    assert_eq!(parses.len(), 0);
}

#[test]
fn json_stringify_of_a_declared_type_validates_with_a_fragment() {
    let result = plan("function f(x: string) {} const v: string = x; JSON.stringify(v);");
    let site = result.sites.iter().find(|s| s.kind == SiteKind::JsonStringify).expect("stringify site");
    assert!(site.is_validated());
    assert!(site.fragment.is_some());
}

#[test]
fn json_stringify_with_no_declared_type_skips_with_a_reason() {
    let result = plan("JSON.stringify(something);");
    let site = result.sites.iter().find(|s| s.kind == SiteKind::JsonStringify).expect("stringify site");
    assert!(!site.is_validated());
    assert!(site.decision.reason.is_some());
    assert!(site.expected_type.is_none());
}

#[test]
fn non_recursive_interface_is_inlined_without_a_stub() {
    // `User` never refers to itself, so the resolver inlines it fully
    // into the parameter's Object type; no `_checkRef_` helper is
    // needed to break a cycle that doesn't exist.
    let result = plan(
        "interface User { name: string; age: number } \
         export function f(u: User) {}",
    );
    let param = result.sites.iter().find(|s| s.kind == SiteKind::Parameter).expect("param site");
    assert!(param.is_validated());
    assert!(result.reference_stubs.is_empty());
}

#[test]
fn self_recursive_interface_produces_exactly_one_stub() {
    let result = plan(
        "interface Node { value: string; next: Node } \
         export function f(n: Node) {}",
    );
    let matching: Vec<_> = result.reference_stubs.iter().filter(|s| s.name == "_checkRef_Node").collect();
    assert_eq!(matching.len(), 1, "cycle detection must not loop or duplicate the stub");
}

#[test]
fn sites_are_returned_in_source_order() {
    let result = plan(
        "export function f(x: string): string { return x; } \
         const v = y as number;",
    );
    let spans: Vec<u32> = result.sites.iter().map(|s| s.byte_span.start).collect();
    let mut sorted = spans.clone();
    sorted.sort();
    assert_eq!(spans, sorted);
}
