use super::*;
use crate::ir::LowerMode;
use rustc_hash::FxHashSet;
use tsassert_model::Resolver;
use tsassert_syntax::parse;

fn lower_alias(src: &str, alias: &str, mode: LowerMode) -> std::sync::Arc<IrNode> {
    let parsed = parse(src).expect("parse");
    let mut resolver = Resolver::new(&parsed.arena);
    resolver.register_program(parsed.root);
    let rhs = parsed
        .arena
        .children(parsed.root)
        .iter()
        .find(|&&d| {
            parsed.arena.kind(d) == tsassert_syntax::NodeKind::TypeAliasDeclaration
                && parsed.arena.name(d) == Some(alias)
        })
        .map(|&d| parsed.arena.children(d)[0])
        .expect("alias");
    let ty = resolver.resolve(rhs).expect("resolve");
    let mut cache = IrCache::new();
    lower(&mut cache, &ty, mode, &FxHashSet::default())
}

#[test]
fn lowers_string_primitive_to_check_typeof() {
    let node = lower_alias("type A = string;", "A", LowerMode::Assert);
    assert!(matches!(node.as_ref(), IrNode::CheckTypeof { kind: PrimitiveKind::String, .. }));
}

#[test]
fn lowers_null_to_check_null_not_check_typeof() {
    let node = lower_alias("type A = null;", "A", LowerMode::Assert);
    assert!(matches!(node.as_ref(), IrNode::CheckNull { .. }));
}

#[test]
fn any_and_unknown_lower_to_noop() {
    let node = lower_alias("type A = any;", "A", LowerMode::Assert);
    assert!(node.is_noop());
}

#[test]
fn object_fields_sort_required_before_optional() {
    let node = lower_alias("type A = { maybe?: string; id: number };", "A", LowerMode::Assert);
    let IrNode::CheckObject { fields, .. } = node.as_ref() else { panic!("expected object") };
    assert_eq!(fields[0].name, "id");
    assert_eq!(fields[1].name, "maybe");
}

#[test]
fn identical_object_shapes_share_ir_hash() {
    let a = lower_alias("type A = { x: string };", "A", LowerMode::Assert);
    let b = lower_alias("type B = { x: string };", "B", LowerMode::Assert);
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn parse_filter_mode_produces_filter_node_for_objects() {
    let node = lower_alias("type A = { x: string };", "A", LowerMode::ParseFilter);
    assert!(matches!(node.as_ref(), IrNode::Filter { .. }));
}

#[test]
fn stringify_mode_produces_pure_node_for_objects() {
    let node = lower_alias("type A = { x: string };", "A", LowerMode::Stringify);
    assert!(matches!(node.as_ref(), IrNode::Pure { .. }));
}

#[test]
fn tuple_lowers_to_check_tuple_with_positional_elements() {
    let node = lower_alias("type A = [string, number];", "A", LowerMode::Assert);
    let IrNode::CheckTuple { elements, rest, .. } = node.as_ref() else { panic!("expected tuple") };
    assert_eq!(elements.len(), 2);
    assert!(rest.is_none());
    assert!(matches!(elements[0].as_ref(), IrNode::CheckTypeof { kind: PrimitiveKind::String, .. }));
    assert!(matches!(elements[1].as_ref(), IrNode::CheckTypeof { kind: PrimitiveKind::Number, .. }));
}

#[test]
fn discriminated_union_carries_discriminant_through_lowering() {
    let src = r#"type A = { t: "a"; v: string } | { t: "b"; v: number };"#;
    let node = lower_alias(src, "A", LowerMode::Assert);
    let IrNode::CheckUnion { discriminant, .. } = node.as_ref() else { panic!("expected union") };
    assert_eq!(discriminant.as_deref(), Some("t"));
}
