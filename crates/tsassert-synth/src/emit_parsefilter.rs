//! Emits the `ParseFilterProjection` fragment (§4.2, §9): validates the
//! structural shape of a freshly `JSON.parse`d value, the same way an
//! `Assert` check would, then returns a copy containing only the
//! declared keys - so excess properties smuggled in over the wire are
//! dropped rather than silently trusted.

use crate::emit_assert::emit_checks_into;
use tsassert_ir::{IrNode, ObjectCheckField};

pub fn emit_parse_filter_fn(node: &IrNode) -> String {
    let mut buf = String::new();
    emit_checks_into(node, "v", "path", 0, &mut buf);
    let copy = build_copy("v", node);
    format!("(v, path) => {{\n{buf}  return {copy};\n}}")
}

fn build_copy(value_expr: &str, node: &IrNode) -> String {
    match node {
        IrNode::Filter { fields, .. } | IrNode::CheckObject { fields, .. } | IrNode::Pure { fields, .. } => {
            build_object_copy(value_expr, fields)
        }
        IrNode::CheckArray { elem, .. } => {
            let inner = build_copy("_el", elem);
            format!("{value_expr}.map((_el) => ({inner}))")
        }
        _ => value_expr.to_string(),
    }
}

fn build_object_copy(value_expr: &str, fields: &[ObjectCheckField]) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|f| {
            let field_value = format!("{value_expr}.{}", f.name);
            let copied = build_copy(&field_value, &f.check);
            if f.optional {
                format!("...({field_value} === undefined ? {{}} : {{ {}: {copied} }})", f.name)
            } else {
                format!("{}: {copied}", f.name)
            }
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

#[cfg(test)]
#[path = "tests/emit_parsefilter.rs"]
mod tests;
