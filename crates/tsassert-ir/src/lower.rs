//! Lowers a canonical `TypeModel` into the Validator IR, the
//! assertion-primitive DAG `tsassert-synth` walks to emit source. Kept
//! as a separate pass from emission so the IR stays a pure data
//! structure: deciding *what* to check is this module's job; deciding
//! *how to word it* is the synthesizer's.

use crate::ir::{IndexCheck, IrCache, IrNode, LowerMode, ObjectCheckField};
use rustc_hash::FxHashSet;
use tsassert_model::TypeModel;
use tsassert_syntax::PrimitiveKind;

pub fn lower(cache: &mut IrCache, ty: &TypeModel, mode: LowerMode, ignored: &FxHashSet<String>) -> std::sync::Arc<IrNode> {
    match ty {
        TypeModel::Primitive { kind: PrimitiveKind::Any, .. }
        | TypeModel::Primitive { kind: PrimitiveKind::Unknown, .. } => noop(cache),

        TypeModel::Primitive { kind: PrimitiveKind::Null, .. } => {
            cache.intern("CheckNull", |hash| IrNode::CheckNull { hash })
        }

        TypeModel::Primitive { kind, .. } => {
            let k = *kind;
            cache.intern(&format!("CheckTypeof:{k:?}"), move |hash| IrNode::CheckTypeof { kind: k, hash })
        }

        TypeModel::Literal { value, .. } => {
            let v = value.clone();
            cache.intern(&format!("CheckLiteral:{v:?}"), move |hash| IrNode::CheckLiteral { value: v.clone(), hash })
        }

        TypeModel::TemplateLiteral { regex, .. } => {
            let pattern = regex.as_str().to_string();
            cache.intern(&format!("CheckTemplate:{pattern}"), move |hash| {
                IrNode::CheckTemplate { pattern: pattern.clone(), hash }
            })
        }

        TypeModel::Array { element, .. } => {
            let elem = lower(cache, element, mode, ignored);
            let sig = format!("CheckArray:{}", elem.hash());
            cache.intern(&sig, move |hash| IrNode::CheckArray { elem, hash })
        }

        TypeModel::Tuple { elements, rest, .. } => {
            let lowered_elements: Vec<_> = elements.iter().map(|e| lower(cache, e, mode, ignored)).collect();
            let lowered_rest = rest.as_ref().map(|r| lower(cache, r, mode, ignored));
            let sig = format!(
                "CheckTuple:[{}]:rest={}",
                lowered_elements.iter().map(|e| e.hash().to_string()).collect::<Vec<_>>().join(","),
                lowered_rest.as_ref().map(|r| r.hash().to_string()).unwrap_or_default()
            );
            cache.intern(&sig, move |hash| IrNode::CheckTuple { elements: lowered_elements, rest: lowered_rest, hash })
        }

        TypeModel::Union { arms, discriminant, .. } => {
            let lowered: Vec<_> = arms.iter().map(|a| lower(cache, a, mode, ignored)).collect();
            let sig = format!(
                "CheckUnion:[{}]:{}",
                lowered.iter().map(|a| a.hash().to_string()).collect::<Vec<_>>().join(","),
                discriminant.as_deref().unwrap_or("")
            );
            let disc = discriminant.clone();
            cache.intern(&sig, move |hash| IrNode::CheckUnion { arms: lowered, discriminant: disc, hash })
        }

        TypeModel::Object { fields, index, .. } => {
            let mut checked_fields: Vec<ObjectCheckField> = fields
                .iter()
                .map(|(name, f)| ObjectCheckField {
                    name: name.clone(),
                    check: lower(cache, &f.ty, mode, ignored),
                    optional: f.optional,
                })
                .collect();
            // Required before optional, scalar before nested (§4.2 item 5).
            checked_fields.sort_by_key(|f| (f.optional, is_nested(&f.check)));

            let index_check = index.as_ref().map(|i| IndexCheck { key: i.key, value: lower(cache, &i.value, mode, ignored) });

            let sig = object_signature(&checked_fields, &index_check);
            match mode {
                LowerMode::Assert => {
                    cache.intern(&sig, move |hash| IrNode::CheckObject { fields: checked_fields, index: index_check, hash })
                }
                LowerMode::ParseFilter => {
                    cache.intern(&format!("Filter:{sig}"), move |hash| IrNode::Filter { fields: checked_fields, hash })
                }
                LowerMode::Stringify => {
                    let source_hash = ty.hash();
                    cache.intern(&format!("Pure:{sig}"), move |hash| {
                        IrNode::Pure { fields: checked_fields, source_hash, hash }
                    })
                }
            }
        }

        TypeModel::Intersection { .. } => noop(cache),

        TypeModel::Reference { id, .. } => {
            if ignored.contains(id) {
                return noop(cache);
            }
            let name = id.clone();
            cache.intern(&format!("Reference:{name}"), move |hash| IrNode::Reference { id: name.clone(), hash })
        }

        TypeModel::Unsupported { .. } => noop(cache),
    }
}

fn noop(cache: &mut IrCache) -> std::sync::Arc<IrNode> {
    cache.intern("Noop", |hash| IrNode::Noop { hash })
}

fn is_nested(node: &IrNode) -> bool {
    matches!(
        node,
        IrNode::CheckObject { .. }
            | IrNode::CheckArray { .. }
            | IrNode::CheckTuple { .. }
            | IrNode::CheckUnion { .. }
            | IrNode::Filter { .. }
            | IrNode::Pure { .. }
    )
}

fn object_signature(fields: &[ObjectCheckField], index: &Option<IndexCheck>) -> String {
    let body = fields
        .iter()
        .map(|f| format!("{}:{}:{}", f.name, f.check.hash(), f.optional))
        .collect::<Vec<_>>()
        .join(",");
    let idx = index.as_ref().map(|i| format!("[{:?}]:{}", i.key, i.value.hash())).unwrap_or_default();
    format!("Object:{{{body}}}:{idx}")
}

#[cfg(test)]
#[path = "tests/lower.rs"]
mod tests;
