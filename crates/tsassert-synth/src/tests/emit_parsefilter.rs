use super::*;
use std::sync::Arc;
use tsassert_ir::{IrHash, ObjectCheckField};
use tsassert_syntax::PrimitiveKind;

fn h(n: u64) -> IrHash {
    IrHash(n)
}

#[test]
fn emits_guard_then_filtered_copy() {
    let check = Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let field = ObjectCheckField { name: "name".to_string(), check, optional: false };
    let node = IrNode::Filter { fields: vec![field], hash: h(1) };
    let src = emit_parse_filter_fn(&node);
    assert!(src.contains("typeof v.name !== \"string\""));
    assert!(src.contains("{ name: v.name }"));
}

#[test]
fn drops_undeclared_keys_via_explicit_copy() {
    let check = Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::Number, hash: h(2) });
    let field = ObjectCheckField { name: "id".to_string(), check, optional: false };
    let node = IrNode::Filter { fields: vec![field], hash: h(1) };
    let src = emit_parse_filter_fn(&node);
    assert!(!src.contains("..."));
    assert!(src.contains("return { id: v.id };"));
}

#[test]
fn optional_field_copied_via_spread_when_present() {
    let check = Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(2) });
    let field = ObjectCheckField { name: "nick".to_string(), check, optional: true };
    let node = IrNode::Filter { fields: vec![field], hash: h(1) };
    let src = emit_parse_filter_fn(&node);
    assert!(src.contains("...(v.nick === undefined ? {} : { nick: v.nick })"));
}

#[test]
fn array_of_objects_copies_each_element() {
    let check = Arc::new(IrNode::CheckTypeof { kind: PrimitiveKind::String, hash: h(3) });
    let field = ObjectCheckField { name: "tag".to_string(), check, optional: false };
    let elem = Arc::new(IrNode::Filter { fields: vec![field], hash: h(2) });
    let node = IrNode::CheckArray { elem, hash: h(1) };
    let src = emit_parse_filter_fn(&node);
    assert!(src.contains("v.map((_el) => ({ tag: _el.tag }))"));
}
