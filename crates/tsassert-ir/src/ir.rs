//! The Validator IR: a DAG of assertion primitives lowered from a
//! `TypeModel`, one level closer to emitted source than the type model
//! itself. Each node carries a stable content-hash id (`IrHash`) so
//! structurally identical validators collapse to one hoisted helper
//! when `reusableValidators` allows it (§4.2 dedup).

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tsassert_model::{LiteralValue, TypeHash};
use tsassert_syntax::PrimitiveKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IrHash(pub u64);

impl std::fmt::Display for IrHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectCheckField {
    pub name: String,
    pub check: Arc<IrNode>,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct IndexCheck {
    pub key: PrimitiveKind,
    pub value: Arc<IrNode>,
}

/// A mode the synthesizer lowers a `TypeModel` into. `Assert` produces
/// a throwing boolean-shaped check tree; `ParseFilter` additionally
/// tracks which keys survive a `JSON.parse` whitelist; `Stringify`
/// tracks which keys a projection copies before `JSON.stringify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LowerMode {
    Assert,
    ParseFilter,
    Stringify,
}

#[derive(Debug, Clone)]
pub enum IrNode {
    CheckTypeof { kind: PrimitiveKind, hash: IrHash },
    CheckNull { hash: IrHash },
    CheckLiteral { value: LiteralValue, hash: IrHash },
    CheckArray { elem: Arc<IrNode>, hash: IrHash },
    /// A fixed-arity tuple: positional per-index checks plus a length
    /// assertion, distinct from `CheckArray` so a 2-tuple `[string,
    /// number]` rejects `["a", "b"]` and any length other than 2.
    CheckTuple { elements: Vec<Arc<IrNode>>, rest: Option<Arc<IrNode>>, hash: IrHash },
    CheckObject { fields: Vec<ObjectCheckField>, index: Option<IndexCheck>, hash: IrHash },
    CheckUnion { arms: Vec<Arc<IrNode>>, discriminant: Option<String>, hash: IrHash },
    CheckTemplate { pattern: String, hash: IrHash },
    /// Named reference to a hoisted helper, used to break cycles: the
    /// referenced node is resolved by name in the synthesizer's helper
    /// table rather than inlined recursively.
    Reference { id: String, hash: IrHash },
    /// `JSON.parse` whitelist projection: copy only declared keys.
    Filter { fields: Vec<ObjectCheckField>, hash: IrHash },
    /// `JSON.stringify` key projection, tracking the declared shape
    /// used to build either an inline builder or a filter function.
    Pure { fields: Vec<ObjectCheckField>, source_hash: TypeHash, hash: IrHash },
    /// A type the synthesizer has no check for (`any`/`unknown`, or a
    /// type model already marked `Unsupported`); lowers to a no-op.
    Noop { hash: IrHash },
}

impl IrNode {
    pub fn hash(&self) -> IrHash {
        match self {
            IrNode::CheckTypeof { hash, .. }
            | IrNode::CheckNull { hash, .. }
            | IrNode::CheckLiteral { hash, .. }
            | IrNode::CheckArray { hash, .. }
            | IrNode::CheckTuple { hash, .. }
            | IrNode::CheckObject { hash, .. }
            | IrNode::CheckUnion { hash, .. }
            | IrNode::CheckTemplate { hash, .. }
            | IrNode::Reference { hash, .. }
            | IrNode::Filter { hash, .. }
            | IrNode::Pure { hash, .. }
            | IrNode::Noop { hash, .. } => *hash,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, IrNode::Noop { .. })
    }
}

/// Interns `IrNode`s by content hash so equal-shaped validators across
/// different call sites in a file share one DAG node (and, later, one
/// hoisted helper name) - see [`crate::lower`].
#[derive(Default)]
pub struct IrCache {
    nodes: FxHashMap<IrHash, Arc<IrNode>>,
}

impl IrCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, signature: &str, build: impl FnOnce(IrHash) -> IrNode) -> Arc<IrNode> {
        let hash = crate::hash::hash_str(signature);
        self.nodes.entry(hash).or_insert_with(|| Arc::new(build(hash))).clone()
    }

    pub fn get(&self, hash: IrHash) -> Option<&Arc<IrNode>> {
        self.nodes.get(&hash)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
