//! The normalized type representation (`TypeModel`) that every other
//! component agrees on. Built once per static type by [`crate::resolve`]
//! and cached by content hash in the session.

use indexmap::IndexMap;
use regex::Regex;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tsassert_syntax::PrimitiveKind;

/// A stable, collision-checked hash of a [`TypeModel`]'s structure.
/// Two `TypeModel`s that are structurally equal always produce the
/// same id; within a session ids are additionally guarded against
/// accidental collision in [`crate::resolve::TypeCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHash(pub u64);

impl std::fmt::Display for TypeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(u64), // bit pattern of the f64, so LiteralValue is Hash + Eq
    Bigint(String),
    Boolean(bool),
}

impl LiteralValue {
    pub fn number(v: f64) -> Self {
        LiteralValue::Number(v.to_bits())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Number(bits) => bits.hash(state),
            LiteralValue::Bigint(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
        }
    }
}

/// One chunk of a template literal type: fixed text, or a placeholder
/// restricted to `{string, number, bigint, Literal}` per invariant I3.
#[derive(Debug, Clone)]
pub enum TemplateChunk {
    Text(String),
    Placeholder(Arc<TypeModel>),
}

#[derive(Debug, Clone)]
pub struct ObjectField {
    pub ty: Arc<TypeModel>,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone)]
pub struct IndexSignature {
    pub key: PrimitiveKind, // String or Number
    pub value: Arc<TypeModel>,
}

/// The normalized, structural representation of a TypeScript type.
///
/// `hash` is a content hash over the normalized shape: structurally
/// equal types always resolve to equal hashes (invariant I1), computed
/// once at construction time by [`crate::resolve`] rather than lazily,
/// since every `TypeModel` is built exactly once and then shared via
/// `Arc`.
#[derive(Debug, Clone)]
pub enum TypeModel {
    Primitive { kind: PrimitiveKind, hash: TypeHash },
    Literal { value: LiteralValue, hash: TypeHash },
    TemplateLiteral { chunks: Vec<TemplateChunk>, regex: Arc<Regex>, hash: TypeHash },
    Object { fields: IndexMap<String, ObjectField>, index: Option<IndexSignature>, hash: TypeHash },
    Array { element: Arc<TypeModel>, min_len: Option<usize>, max_len: Option<usize>, hash: TypeHash },
    Tuple { elements: Vec<Arc<TypeModel>>, rest: Option<Arc<TypeModel>>, hash: TypeHash },
    Union { arms: Vec<Arc<TypeModel>>, discriminant: Option<String>, hash: TypeHash },
    Intersection { arms: Vec<Arc<TypeModel>>, hash: TypeHash },
    /// A named binding to a shared type, used to break cycles (I2). The
    /// referenced type lives in the session's `TypeCache` keyed by `id`.
    Reference { id: String, hash: TypeHash },
    /// A type the synthesizer could not resolve to a supported shape;
    /// callers degrade the owning site to SKIP with `reason`.
    Unsupported { reason: String, hash: TypeHash },
}

impl TypeModel {
    pub fn hash(&self) -> TypeHash {
        match self {
            TypeModel::Primitive { hash, .. }
            | TypeModel::Literal { hash, .. }
            | TypeModel::TemplateLiteral { hash, .. }
            | TypeModel::Object { hash, .. }
            | TypeModel::Array { hash, .. }
            | TypeModel::Tuple { hash, .. }
            | TypeModel::Union { hash, .. }
            | TypeModel::Intersection { hash, .. }
            | TypeModel::Reference { hash, .. }
            | TypeModel::Unsupported { hash, .. } => *hash,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, TypeModel::Unsupported { .. })
    }

    /// `any` / `unknown` widen casts and parameters are never validated
    /// against - see EscapeAnalyzer §4.3 Cast rule.
    pub fn is_top_type(&self) -> bool {
        matches!(
            self,
            TypeModel::Primitive { kind: PrimitiveKind::Any, .. }
                | TypeModel::Primitive { kind: PrimitiveKind::Unknown, .. }
        )
    }

    pub fn as_object_fields(&self) -> Option<&IndexMap<String, ObjectField>> {
        match self {
            TypeModel::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }
}
