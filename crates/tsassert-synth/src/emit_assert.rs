//! Emits the statement body of an `Assert`-mode validator: `(v, path)
//! => { ...throwing checks...; return v; }`, ordered cheapest-first per
//! §4.2: typeof, null, discriminant, template regex, structural field
//! walk (required before optional - already sorted by `tsassert-ir`),
//! then array length/elements.

use crate::escaping::js_string_literal;
use tsassert_common::limits::MAX_TYPE_RECURSION_DEPTH;
use tsassert_ir::IrNode;
use tsassert_syntax::PrimitiveKind;

pub fn emit_validator_fn(node: &IrNode) -> String {
    let mut buf = String::new();
    emit_checks(node, "v", "path", 0, &mut buf);
    format!("(v, path) => {{\n{buf}  return v;\n}}")
}

fn js_typeof_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Bigint => "bigint",
        PrimitiveKind::Undefined => "undefined",
        PrimitiveKind::Null | PrimitiveKind::Any | PrimitiveKind::Unknown | PrimitiveKind::Never | PrimitiveKind::Void => "object",
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

/// Exposed for [`crate::emit_parsefilter`], which prefixes its copy
/// construction with the same structural guards `Assert` mode emits.
pub(crate) fn emit_checks_into(node: &IrNode, value: &str, path: &str, depth: usize, buf: &mut String) {
    emit_checks(node, value, path, depth, buf)
}

fn emit_checks(node: &IrNode, value: &str, path: &str, depth: usize, buf: &mut String) {
    if depth > MAX_TYPE_RECURSION_DEPTH {
        return;
    }
    let pad = indent(depth);
    match node {
        IrNode::Noop { .. } => {}

        IrNode::CheckTypeof { kind, .. } => {
            let name = js_typeof_name(*kind);
            buf.push_str(&format!(
                "{pad}if (typeof {value} !== \"{name}\") {{ throw new TypeError(\"Expected \" + {path} + \" to be {name}, got \" + typeof {value}); }}\n"
            ));
        }

        IrNode::CheckNull { .. } => {
            buf.push_str(&format!(
                "{pad}if ({value} !== null) {{ throw new TypeError(\"Expected \" + {path} + \" to be null, got \" + typeof {value}); }}\n"
            ));
        }

        IrNode::CheckLiteral { value: lit, .. } => {
            let rhs = literal_js(lit);
            buf.push_str(&format!(
                "{pad}if ({value} !== {rhs}) {{ throw new TypeError(\"Expected \" + {path} + \" to equal {rhs}\"); }}\n"
            ));
        }

        IrNode::CheckTemplate { pattern, .. } => {
            let pat_lit = js_string_literal(pattern);
            buf.push_str(&format!(
                "{pad}if (typeof {value} !== \"string\" || !(new RegExp({pat_lit})).test({value})) {{ throw new TypeError(\"Expected \" + {path} + \" to match `{pattern}`\"); }}\n"
            ));
        }

        IrNode::CheckArray { elem, .. } => {
            buf.push_str(&format!(
                "{pad}if (!Array.isArray({value})) {{ throw new TypeError(\"Expected \" + {path} + \" to be an array, got \" + typeof {value}); }}\n"
            ));
            let item = format!("_item{depth}");
            let idx = format!("_i{depth}");
            let item_path = format!("({path} + \"[\" + {idx} + \"]\")");
            buf.push_str(&format!("{pad}{value}.forEach(({item}, {idx}) => {{\n"));
            emit_checks(elem, &item, &item_path, depth + 1, buf);
            buf.push_str(&format!("{pad}}});\n"));
        }

        IrNode::CheckTuple { elements, rest, .. } => {
            buf.push_str(&format!(
                "{pad}if (!Array.isArray({value})) {{ throw new TypeError(\"Expected \" + {path} + \" to be an array, got \" + typeof {value}); }}\n"
            ));
            let min_len = elements.len();
            if rest.is_some() {
                buf.push_str(&format!(
                    "{pad}if ({value}.length < {min_len}) {{ throw new TypeError(\"Expected \" + {path} + \" to have at least {min_len} elements, got \" + {value}.length); }}\n"
                ));
            } else {
                buf.push_str(&format!(
                    "{pad}if ({value}.length !== {min_len}) {{ throw new TypeError(\"Expected \" + {path} + \" to have exactly {min_len} elements, got \" + {value}.length); }}\n"
                ));
            }
            for (i, elem) in elements.iter().enumerate() {
                let item_value = format!("{value}[{i}]");
                let item_path = format!("({path} + \"[{i}]\")");
                emit_checks(elem, &item_value, &item_path, depth, buf);
            }
            if let Some(rest_elem) = rest {
                let item = format!("_item{depth}");
                let idx = format!("_i{depth}");
                let item_path = format!("({path} + \"[\" + ({min_len} + {idx}) + \"]\")");
                buf.push_str(&format!("{pad}{value}.slice({min_len}).forEach(({item}, {idx}) => {{\n"));
                emit_checks(rest_elem, &item, &item_path, depth + 1, buf);
                buf.push_str(&format!("{pad}}});\n"));
            }
        }

        IrNode::CheckObject { fields, index, .. } => {
            buf.push_str(&format!(
                "{pad}if (typeof {value} !== \"object\" || {value} === null) {{ throw new TypeError(\"Expected \" + {path} + \" to be an object, got \" + typeof {value}); }}\n"
            ));
            for field in fields {
                let field_value = format!("{value}.{}", field.name);
                let field_path = format!("({path} + \".{}\")", field.name);
                if field.optional {
                    buf.push_str(&format!("{pad}if ({field_value} !== undefined) {{\n"));
                    emit_checks(&field.check, &field_value, &field_path, depth + 1, buf);
                    buf.push_str(&format!("{pad}}}\n"));
                } else {
                    emit_checks(&field.check, &field_value, &field_path, depth, buf);
                }
            }
            if let Some(idx) = index {
                let key_name = format!("_k{depth}");
                let key_path = format!("({path} + \".\" + {key_name})");
                buf.push_str(&format!("{pad}for (const {key_name} of Object.keys({value})) {{\n"));
                emit_checks(&idx.value, &format!("{value}[{key_name}]"), &key_path, depth + 1, buf);
                buf.push_str(&format!("{pad}}}\n"));
            }
        }

        IrNode::CheckUnion { arms, discriminant, .. } => {
            if let Some(disc) = discriminant {
                emit_discriminated_union(arms, disc, value, path, depth, buf);
            } else {
                let predicate = arms.iter().map(|a| predicate_expr(a, value)).collect::<Vec<_>>().join(" || ");
                buf.push_str(&format!(
                    "{pad}if (!({predicate})) {{ throw new TypeError(\"Expected \" + {path} + \" to match one of the union members\"); }}\n"
                ));
            }
        }

        // References are resolved by the planner wiring a hoisted helper
        // named after the referenced type; the stub exists before its
        // body is synthesized so recursive references resolve (§9).
        IrNode::Reference { id, .. } => {
            buf.push_str(&format!("{pad}_checkRef_{id}({value}, {path});\n"));
        }

        // `Filter`/`Pure` only appear under ParseFilter/Stringify modes;
        // falling back to a structural object check keeps Assert-mode
        // emission total even if a node is reused across modes.
        IrNode::Filter { fields, .. } | IrNode::Pure { fields, .. } => {
            let synthetic = IrNode::CheckObject { fields: fields.clone(), index: None, hash: node.hash() };
            emit_checks(&synthetic, value, path, depth, buf);
        }
    }
}

fn emit_discriminated_union(arms: &[std::sync::Arc<IrNode>], disc: &str, value: &str, path: &str, depth: usize, buf: &mut String) {
    let pad = indent(depth);
    let tag_value = format!("{value}.{disc}");
    buf.push_str(&format!("{pad}switch ({tag_value}) {{\n"));
    for arm in arms {
        if let IrNode::CheckObject { fields, .. } = arm.as_ref() {
            if let Some(tag_field) = fields.iter().find(|f| f.name == disc) {
                if let IrNode::CheckLiteral { value: lit, .. } = tag_field.check.as_ref() {
                    buf.push_str(&format!("{pad}  case {}: {{\n", literal_js(lit)));
                    emit_checks(arm, value, path, depth + 2, buf);
                    buf.push_str(&format!("{pad}    break;\n{pad}  }}\n"));
                    continue;
                }
            }
        }
    }
    buf.push_str(&format!(
        "{pad}  default: throw new TypeError(\"Expected \" + {path} + \".{disc} to be a recognized discriminant, got \" + {tag_value});\n"
    ));
    buf.push_str(&format!("{pad}}}\n"));
}

/// Boolean predicate form, used inside non-discriminated unions where
/// we can't usefully attribute one failing arm's error to the whole.
fn predicate_expr(node: &IrNode, value: &str) -> String {
    match node {
        IrNode::Noop { .. } => "true".to_string(),
        IrNode::CheckTypeof { kind, .. } => format!("typeof {value} === \"{}\"", js_typeof_name(*kind)),
        IrNode::CheckNull { .. } => format!("{value} === null"),
        IrNode::CheckLiteral { value: lit, .. } => format!("{value} === {}", literal_js(lit)),
        IrNode::CheckTemplate { pattern, .. } => {
            format!("(typeof {value} === \"string\" && (new RegExp({})).test({value}))", js_string_literal(pattern))
        }
        IrNode::CheckArray { elem, .. } => {
            format!("(Array.isArray({value}) && {value}.every((_el) => {}))", predicate_expr(elem, "_el"))
        }
        IrNode::CheckTuple { elements, rest, .. } => {
            let len_check = if rest.is_some() {
                format!("{value}.length >= {}", elements.len())
            } else {
                format!("{value}.length === {}", elements.len())
            };
            let mut parts = vec![format!("Array.isArray({value})"), len_check];
            for (i, elem) in elements.iter().enumerate() {
                parts.push(predicate_expr(elem, &format!("{value}[{i}]")));
            }
            if let Some(rest_elem) = rest {
                parts.push(format!(
                    "{value}.slice({}).every((_el) => {})",
                    elements.len(),
                    predicate_expr(rest_elem, "_el")
                ));
            }
            format!("({})", parts.join(" && "))
        }
        IrNode::CheckObject { fields, .. } | IrNode::Filter { fields, .. } | IrNode::Pure { fields, .. } => {
            let parts: Vec<String> = fields
                .iter()
                .map(|f| {
                    let fv = format!("{value}.{}", f.name);
                    if f.optional {
                        format!("({fv} === undefined || {})", predicate_expr(&f.check, &fv))
                    } else {
                        predicate_expr(&f.check, &fv)
                    }
                })
                .collect();
            format!("(typeof {value} === \"object\" && {value} !== null && {})", parts.join(" && "))
        }
        IrNode::CheckUnion { arms, .. } => {
            format!("({})", arms.iter().map(|a| predicate_expr(a, value)).collect::<Vec<_>>().join(" || "))
        }
        IrNode::Reference { id, .. } => format!("_matchRef_{id}({value})"),
    }
}

fn literal_js(lit: &tsassert_model::LiteralValue) -> String {
    use tsassert_model::LiteralValue;
    match lit {
        LiteralValue::String(s) => js_string_literal(s),
        LiteralValue::Number(_) => lit.as_number().map(|n| n.to_string()).unwrap_or_else(|| "NaN".to_string()),
        LiteralValue::Bigint(s) => format!("{s}n"),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/emit_assert.rs"]
mod tests;
