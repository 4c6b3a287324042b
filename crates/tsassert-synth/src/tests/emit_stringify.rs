use super::*;
use std::sync::Arc;
use tsassert_ir::{IrHash, ObjectCheckField};

fn h(n: u64) -> IrHash {
    IrHash(n)
}

fn leaf(kind: PrimitiveKindAlias) -> Arc<IrNode> {
    Arc::new(IrNode::CheckTypeof { kind: kind.0, hash: h(99) })
}

struct PrimitiveKindAlias(tsassert_syntax::PrimitiveKind);

#[test]
fn count_leaves_counts_object_fields() {
    let fields = vec![
        ObjectCheckField { name: "a".to_string(), check: leaf(PrimitiveKindAlias(tsassert_syntax::PrimitiveKind::String)), optional: false },
        ObjectCheckField { name: "b".to_string(), check: leaf(PrimitiveKindAlias(tsassert_syntax::PrimitiveKind::Number)), optional: false },
    ];
    let node = IrNode::Pure { fields, source_hash: tsassert_model::TypeHash(1), hash: h(1) };
    assert_eq!(count_leaves(&node), 2);
}

#[test]
fn small_object_uses_inline_builder() {
    let fields = vec![ObjectCheckField {
        name: "name".to_string(),
        check: leaf(PrimitiveKindAlias(tsassert_syntax::PrimitiveKind::String)),
        optional: false,
    }];
    let node = IrNode::Pure { fields, source_hash: tsassert_model::TypeHash(1), hash: h(1) };
    let src = emit_stringify_fn(&node);
    assert!(src.contains(JSON_VALUE_HELPER_NAME));
    assert!(src.contains("\"name\""));
    assert!(!src.contains("JSON.stringify"));
}

#[test]
fn wide_object_falls_back_to_filter_and_native_stringify() {
    let fields: Vec<ObjectCheckField> = (0..20)
        .map(|i| ObjectCheckField {
            name: format!("f{i}"),
            check: leaf(PrimitiveKindAlias(tsassert_syntax::PrimitiveKind::String)),
            optional: false,
        })
        .collect();
    let node = IrNode::Pure { fields, source_hash: tsassert_model::TypeHash(1), hash: h(1) };
    let src = emit_stringify_fn(&node);
    assert!(src.contains("JSON.stringify("));
}

#[test]
fn optional_field_omitted_when_undefined_in_inline_builder() {
    let fields = vec![ObjectCheckField {
        name: "nick".to_string(),
        check: leaf(PrimitiveKindAlias(tsassert_syntax::PrimitiveKind::String)),
        optional: true,
    }];
    let node = IrNode::Pure { fields, source_hash: tsassert_model::TypeHash(1), hash: h(1) };
    let src = emit_stringify_fn(&node);
    assert!(src.contains("=== undefined ?"));
}
