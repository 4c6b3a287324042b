//! Compiles a template literal type's chunks into the single anchored
//! regex invariant I3 requires: placeholder patterns are `number` → the
//! JSON-number grammar, `bigint` → `-?\d+`, `string` → `.*?` (lazy, so
//! adjacent chunks still anchor correctly), and `Literal` → the escaped
//! literal text.

use crate::types::{LiteralValue, TemplateChunk, TypeModel};
use regex::Regex;
use tsassert_syntax::PrimitiveKind;

const JSON_NUMBER_PATTERN: &str = r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?";
const BIGINT_PATTERN: &str = r"-?\d+";

pub fn compile(chunks: &[TemplateChunk]) -> Regex {
    let mut pattern = String::from("^");
    for chunk in chunks {
        match chunk {
            TemplateChunk::Text(text) => pattern.push_str(&regex::escape(text)),
            TemplateChunk::Placeholder(ty) => pattern.push_str(&placeholder_pattern(ty)),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).unwrap_or_else(|_| Regex::new("^$").expect("empty regex always compiles"))
}

fn placeholder_pattern(ty: &TypeModel) -> String {
    match ty {
        TypeModel::Primitive { kind: PrimitiveKind::String, .. } => ".*?".to_string(),
        TypeModel::Primitive { kind: PrimitiveKind::Number, .. } => JSON_NUMBER_PATTERN.to_string(),
        TypeModel::Primitive { kind: PrimitiveKind::Bigint, .. } => BIGINT_PATTERN.to_string(),
        TypeModel::Literal { value, .. } => literal_pattern(value),
        TypeModel::Union { arms, .. } => {
            let alternatives: Vec<String> = arms.iter().map(|a| placeholder_pattern(a)).collect();
            format!("(?:{})", alternatives.join("|"))
        }
        // Unsupported placeholder shapes degrade to an unrestricted
        // match; the owning site still resolves to `Unsupported`
        // upstream and will be skipped with a reason.
        _ => ".*?".to_string(),
    }
}

fn literal_pattern(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => regex::escape(s),
        LiteralValue::Number(_) => regex::escape(&format!("{}", value.as_number().unwrap_or_default())),
        LiteralValue::Bigint(s) => regex::escape(s),
        LiteralValue::Boolean(b) => regex::escape(&b.to_string()),
    }
}

/// `` `${string}` `` degrades to plain `string` per §4.1.
pub fn is_trivial_string_wrapper(chunks: &[TemplateChunk]) -> bool {
    matches!(
        chunks,
        [TemplateChunk::Placeholder(ty)] if matches!(**ty, TypeModel::Primitive { kind: PrimitiveKind::String, .. })
    )
}

#[cfg(test)]
#[path = "tests/template.rs"]
mod tests;
