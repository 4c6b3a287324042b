use super::*;
use tsassert_ir::IrHash;

fn h(n: u64) -> IrHash {
    IrHash(n)
}

fn small_node() -> IrNode {
    IrNode::CheckTypeof { kind: tsassert_syntax::PrimitiveKind::String, hash: h(1) }
}

fn large_object(field_count: usize) -> IrNode {
    let fields = (0..field_count)
        .map(|i| tsassert_ir::ObjectCheckField {
            name: format!("f{i}"),
            check: std::sync::Arc::new(IrNode::CheckTypeof { kind: tsassert_syntax::PrimitiveKind::String, hash: h(100 + i as u64) }),
            optional: false,
        })
        .collect();
    IrNode::CheckObject { fields, index: None, hash: h(2) }
}

#[test]
fn false_policy_always_inlines() {
    let mut synth = Synthesizer::new(ReusableValidators::False, None);
    let node = large_object(20);
    let frag = synth.synthesize(&node, LowerMode::Assert, "site");
    assert!(frag.expr.starts_with("(v, path) =>"));
    assert!(frag.new_helpers.is_empty());
}

#[test]
fn true_policy_always_hoists() {
    let mut synth = Synthesizer::new(ReusableValidators::True, None);
    let node = small_node();
    let frag = synth.synthesize(&node, LowerMode::Assert, "site");
    assert!(frag.expr.starts_with("_check_assert_"));
    assert_eq!(frag.new_helpers.len(), 1);
}

#[test]
fn auto_policy_inlines_small_single_use_fragment() {
    let mut synth = Synthesizer::new(ReusableValidators::Auto, None);
    let node = small_node();
    let frag = synth.synthesize(&node, LowerMode::Assert, "site");
    assert!(frag.expr.starts_with("(v, path) =>"));
}

#[test]
fn auto_policy_hoists_large_fragment_on_first_use() {
    let mut synth = Synthesizer::new(ReusableValidators::Auto, None);
    let node = large_object(20);
    let frag = synth.synthesize(&node, LowerMode::Assert, "site");
    assert!(frag.expr.starts_with("_check_assert_"));
}

#[test]
fn auto_policy_hoists_on_second_use_of_small_fragment() {
    let mut synth = Synthesizer::new(ReusableValidators::Auto, None);
    let node = small_node();
    let first = synth.synthesize(&node, LowerMode::Assert, "site_a");
    let second = synth.synthesize(&node, LowerMode::Assert, "site_b");
    assert!(first.expr.starts_with("(v, path) =>"));
    assert!(second.expr.starts_with("_check_assert_"));
}

#[test]
fn repeated_shape_reuses_same_hoisted_helper() {
    let mut synth = Synthesizer::new(ReusableValidators::True, None);
    let node = small_node();
    let first = synth.synthesize(&node, LowerMode::Assert, "a");
    let second = synth.synthesize(&node, LowerMode::Assert, "b");
    assert_eq!(first.expr, second.expr);
    assert_eq!(synth.hoisted_helpers().len(), 1);
}

#[test]
fn max_generated_functions_caps_hoisting() {
    let mut synth = Synthesizer::new(ReusableValidators::True, Some(1));
    let a = IrNode::CheckTypeof { kind: tsassert_syntax::PrimitiveKind::String, hash: h(1) };
    let b = IrNode::CheckTypeof { kind: tsassert_syntax::PrimitiveKind::Number, hash: h(2) };
    let frag_a = synth.synthesize(&a, LowerMode::Assert, "a");
    let frag_b = synth.synthesize(&b, LowerMode::Assert, "b");
    assert!(frag_a.expr.starts_with("_check_assert_"));
    assert!(frag_b.expr.starts_with("(v, path) =>"));
    assert_eq!(synth.hoisted_helpers().len(), 1);
}

#[test]
fn stringify_mode_emits_runtime_helpers_once() {
    let mut synth = Synthesizer::new(ReusableValidators::False, None);
    let fields = vec![tsassert_ir::ObjectCheckField {
        name: "a".to_string(),
        check: std::sync::Arc::new(IrNode::CheckTypeof { kind: tsassert_syntax::PrimitiveKind::String, hash: h(3) }),
        optional: false,
    }];
    let node_a = IrNode::Pure { fields: fields.clone(), source_hash: tsassert_model::TypeHash(1), hash: h(10) };
    let node_b = IrNode::Pure { fields, source_hash: tsassert_model::TypeHash(2), hash: h(11) };
    let frag_a = synth.synthesize(&node_a, LowerMode::Stringify, "a");
    let frag_b = synth.synthesize(&node_b, LowerMode::Stringify, "b");
    assert_eq!(frag_a.new_helpers.len(), 2);
    assert!(frag_b.new_helpers.is_empty());
}
