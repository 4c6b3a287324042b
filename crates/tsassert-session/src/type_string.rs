//! Renders a `TypeModel` back into a short, human-readable type string
//! for `ValidationItem.typeString` (§6). Best-effort: this is a
//! diagnostic label, not a type-checker's pretty-printer, so shapes
//! that don't round-trip exactly (template literals, index signatures)
//! get an approximate rendering.

use tsassert_model::{IndexSignature, LiteralValue, ObjectField, TypeModel};
use tsassert_syntax::PrimitiveKind;

pub fn render(ty: &TypeModel) -> String {
    match ty {
        TypeModel::Primitive { kind, .. } => primitive_name(*kind).to_string(),
        TypeModel::Literal { value, .. } => literal(value),
        TypeModel::TemplateLiteral { .. } => "`...`".to_string(),
        TypeModel::Object { fields, index, .. } => object(fields, index.as_ref()),
        TypeModel::Array { element, .. } => format!("{}[]", render(element)),
        TypeModel::Tuple { elements, rest, .. } => tuple(elements, rest.as_deref()),
        TypeModel::Union { arms, .. } => join(arms, " | "),
        TypeModel::Intersection { arms, .. } => join(arms, " & "),
        TypeModel::Reference { id, .. } => id.clone(),
        TypeModel::Unsupported { reason, .. } => format!("unsupported<{reason}>"),
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Any => "any",
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Bigint => "bigint",
        PrimitiveKind::Null => "null",
        PrimitiveKind::Undefined => "undefined",
        PrimitiveKind::Unknown => "unknown",
        PrimitiveKind::Never => "never",
        PrimitiveKind::Void => "void",
    }
}

fn literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => format!("{s:?}"),
        LiteralValue::Number(_) => value.as_number().unwrap_or_default().to_string(),
        LiteralValue::Bigint(digits) => format!("{digits}n"),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

fn object(fields: &indexmap::IndexMap<String, ObjectField>, index: Option<&IndexSignature>) -> String {
    let mut members: Vec<String> = fields
        .iter()
        .map(|(name, field)| {
            let optional = if field.optional { "?" } else { "" };
            format!("{name}{optional}: {}", render(&field.ty))
        })
        .collect();
    if let Some(idx) = index {
        let key = primitive_name(idx.key);
        members.push(format!("[key: {key}]: {}", render(&idx.value)));
    }
    format!("{{ {} }}", members.join("; "))
}

fn tuple(elements: &[std::sync::Arc<TypeModel>], rest: Option<&TypeModel>) -> String {
    let mut parts: Vec<String> = elements.iter().map(|e| render(e)).collect();
    if let Some(rest) = rest {
        parts.push(format!("...{}[]", render(rest)));
    }
    format!("[{}]", parts.join(", "))
}

fn join(arms: &[std::sync::Arc<TypeModel>], sep: &str) -> String {
    arms.iter().map(|a| render(a)).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
#[path = "tests/type_string.rs"]
mod tests;
