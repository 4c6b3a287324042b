use super::*;
use tsassert_ir::{IrHash, ObjectCheckField};

fn h(n: u64) -> IrHash {
    IrHash(n)
}

#[test]
fn emits_typeof_guard() {
    let node = IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("typeof v !== \"string\""));
    assert!(src.contains("throw new TypeError"));
    assert!(src.contains("return v;"));
}

#[test]
fn emits_null_guard() {
    let node = IrNode::CheckNull { hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("v !== null"));
}

#[test]
fn emits_literal_equality_with_escaped_string() {
    let node = IrNode::CheckLiteral { value: tsassert_model::LiteralValue::String("a\"b".to_string()), hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("v !== \"a\\\"b\""));
}

#[test]
fn emits_array_foreach_with_extended_path() {
    let elem = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::Number, hash: h(2) });
    let node = IrNode::CheckArray { elem, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("Array.isArray(v)"));
    assert!(src.contains(".forEach("));
    assert!(src.contains("\"[\" + _i1 + \"]\""));
}

#[test]
fn emits_tuple_positional_checks_and_exact_length_guard() {
    let a = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let b = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::Number, hash: h(3) });
    let node = IrNode::CheckTuple { elements: vec![a, b], rest: None, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("Array.isArray(v)"));
    assert!(src.contains("v.length !== 2"));
    assert!(src.contains("typeof v[0] !== \"string\""));
    assert!(src.contains("typeof v[1] !== \"number\""));
    assert!(!src.contains(".forEach("), "a fixed tuple has no rest element to loop-check");
}

#[test]
fn emits_tuple_rest_as_a_minimum_length_guard_and_loop() {
    let a = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let rest = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::Number, hash: h(3) });
    let node = IrNode::CheckTuple { elements: vec![a], rest: Some(rest), hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("v.length < 1"));
    assert!(src.contains("typeof v[0] !== \"string\""));
    assert!(src.contains(".slice(1).forEach("));
}

#[test]
fn emits_object_optional_field_guard() {
    let check = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let field = ObjectCheckField { name: "name".to_string(), check, optional: true };
    let node = IrNode::CheckObject { fields: vec![field], index: None, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("if (v.name !== undefined) {"));
    assert!(src.contains("typeof v.name !== \"string\""));
}

#[test]
fn emits_required_field_without_undefined_guard() {
    let check = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let field = ObjectCheckField { name: "name".to_string(), check, optional: false };
    let node = IrNode::CheckObject { fields: vec![field], index: None, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(!src.contains("if (v.name !== undefined)"));
    assert!(src.contains("typeof v.name !== \"string\""));
}

#[test]
fn emits_discriminated_union_as_switch() {
    let tag_check = std::sync::Arc::new(IrNode::CheckLiteral {
        value: tsassert_model::LiteralValue::String("a".to_string()),
        hash: h(3),
    });
    let arm = std::sync::Arc::new(IrNode::CheckObject {
        fields: vec![ObjectCheckField { name: "kind".to_string(), check: tag_check, optional: false }],
        index: None,
        hash: h(2),
    });
    let node = IrNode::CheckUnion { arms: vec![arm], discriminant: Some("kind".to_string()), hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("switch (v.kind)"));
    assert!(src.contains("case \"a\":"));
    assert!(src.contains("default: throw new TypeError"));
}

#[test]
fn emits_non_discriminated_union_as_predicate() {
    let a = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let b = std::sync::Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::Number, hash: h(3) });
    let node = IrNode::CheckUnion { arms: vec![a, b], discriminant: None, hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("typeof v === \"string\" || typeof v === \"number\""));
}

#[test]
fn noop_emits_nothing_but_return() {
    let node = IrNode::Noop { hash: h(1) };
    let src = emit_validator_fn(&node);
    assert_eq!(src, "(v, path) => {\n  return v;\n}");
}

#[test]
fn reference_calls_hoisted_check_helper() {
    let node = IrNode::Reference { id: "User".to_string(), hash: h(1) };
    let src = emit_validator_fn(&node);
    assert!(src.contains("_checkRef_User(v, path);"));
}
