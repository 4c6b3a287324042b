//! Emits the `StringifyProjection` fragment (§4.2, §9): a function that
//! copies only the declared leaves of a value before `JSON.stringify`
//! sees it, so extra runtime properties never leak into the wire
//! format. Below `STRINGIFY_BUILDER_MAX_LEAVES` declared leaves we emit
//! an inline builder that formats JSON text by hand (faster, no
//! intermediate object allocation); at or above it we emit a
//! filter-then-`JSON.stringify` function, since `JSON.stringify`
//! already implements every leaf-formatting rule in P4 once it is
//! handed a plain object with only the declared keys.

use crate::escaping::JSON_VALUE_HELPER_NAME;
use tsassert_common::limits::STRINGIFY_BUILDER_MAX_LEAVES;
use tsassert_ir::{IrNode, ObjectCheckField};

/// Counts declared leaf keys reachable from `node`, recursing through
/// nested `Pure`/`CheckObject` shapes. Arrays and unions count their
/// element/arm leaves once, matching how many distinct key-accesses the
/// emitted code performs.
pub fn count_leaves(node: &IrNode) -> usize {
    match node {
        IrNode::Pure { fields, .. } | IrNode::Filter { fields, .. } | IrNode::CheckObject { fields, .. } => {
            fields.iter().map(|f| count_leaves(&f.check).max(1)).sum()
        }
        IrNode::CheckArray { elem, .. } => count_leaves(elem).max(1),
        IrNode::CheckUnion { arms, .. } => arms.iter().map(count_leaves).max().unwrap_or(1),
        _ => 1,
    }
}

pub fn emit_stringify_fn(node: &IrNode) -> String {
    if count_leaves(node) < STRINGIFY_BUILDER_MAX_LEAVES {
        emit_inline_builder(node)
    } else {
        emit_filter_then_stringify(node)
    }
}

fn emit_inline_builder(node: &IrNode) -> String {
    let mut buf = String::new();
    let expr = build_expr("v", node, &mut buf);
    format!("(v) => {{\n{buf}  return {expr};\n}}")
}

/// Builds a JS expression string that evaluates to the JSON text for
/// `value_expr` under `node`'s declared shape, hoisting any `const`
/// bindings it needs into `buf` first (kept flat rather than nested to
/// avoid deeply indented arrow bodies for wide objects).
fn build_expr(value_expr: &str, node: &IrNode, buf: &mut String) -> String {
    match node {
        IrNode::Pure { fields, .. } | IrNode::Filter { fields, .. } | IrNode::CheckObject { fields, .. } => {
            build_object_expr(value_expr, fields, buf)
        }
        IrNode::CheckArray { elem, .. } => {
            let inner = build_expr("_el", elem, buf);
            format!("\"[\" + {value_expr}.map((_el) => {inner}).join(\",\") + \"]\"")
        }
        _ => format!("{JSON_VALUE_HELPER_NAME}({value_expr})"),
    }
}

fn build_object_expr(value_expr: &str, fields: &[ObjectCheckField], buf: &mut String) -> String {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        let field_value = format!("{value_expr}.{}", field.name);
        let inner = build_expr(&field_value, &field.check, buf);
        let key = crate::escaping::js_string_literal(&field.name);
        if field.optional {
            parts.push(format!("({field_value} === undefined ? \"\" : {key} + \":\" + {inner})"));
        } else {
            parts.push(format!("{key} + \":\" + {inner}"));
        }
    }
    if fields.iter().any(|f| f.optional) {
        format!("\"{{\" + [{}].filter((s) => s !== \"\").join(\",\") + \"}}\"", parts.join(", "))
    } else {
        format!("\"{{\" + [{}].join(\",\") + \"}}\"", parts.join(", "))
    }
}

fn emit_filter_then_stringify(node: &IrNode) -> String {
    let mut buf = String::new();
    let projected = build_filter_copy("v", node, &mut buf);
    format!("(v) => {{\n{buf}  return JSON.stringify({projected});\n}}")
}

/// Builds an expression that deep-copies only declared keys from
/// `value_expr`, to be handed to native `JSON.stringify`.
fn build_filter_copy(value_expr: &str, node: &IrNode, buf: &mut String) -> String {
    match node {
        IrNode::Pure { fields, .. } | IrNode::Filter { fields, .. } | IrNode::CheckObject { fields, .. } => {
            let entries: Vec<String> = fields
                .iter()
                .map(|f| {
                    let field_value = format!("{value_expr}.{}", f.name);
                    let copied = build_filter_copy(&field_value, &f.check, buf);
                    if f.optional {
                        format!("...({field_value} === undefined ? {{}} : {{ {}: {copied} }})", f.name)
                    } else {
                        format!("{}: {copied}", f.name)
                    }
                })
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
        IrNode::CheckArray { elem, .. } => {
            let inner = build_filter_copy("_el", elem, buf);
            format!("{value_expr}.map((_el) => ({inner}))")
        }
        _ => value_expr.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/emit_stringify.rs"]
mod tests;
