//! A `TypeOracle` backed directly by a parsed file's AST.
//!
//! The system's own purpose statement treats the checker as an opaque,
//! externally supplied capability. This crate has no host compiler to
//! borrow one from, so it ships its own: type annotations are read
//! straight off `tsassert-syntax`'s arena rather than inferred or
//! widened. This is sufficient for the candidate-site grammar
//! `SitePlanner` walks (explicit annotations on parameters, returns,
//! casts) - it does not perform control-flow type inference.

use crate::oracle::{OracleType, Symbol, TypeOracle};
use rustc_hash::FxHashMap;
use tsassert_syntax::{NodeArena, NodeIndex, NodeKind};

pub struct StructuralOracle<'a> {
    arena: &'a NodeArena,
    exported: FxHashMap<NodeIndex, bool>,
}

impl<'a> StructuralOracle<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        StructuralOracle { arena, exported: FxHashMap::default() }
    }

    pub fn mark_exported(&mut self, node: NodeIndex, exported: bool) {
        self.exported.insert(node, exported);
    }
}

impl<'a> TypeOracle for StructuralOracle<'a> {
    fn type_at(&self, node: NodeIndex) -> OracleType {
        OracleType::Node(node)
    }

    fn symbol_of(&self, node: NodeIndex) -> Option<Symbol> {
        let name = self.arena.name(node)?.to_string();
        let exported = self.exported.get(&node).copied().unwrap_or(false);
        Some(Symbol { name, declaration: node, exported })
    }

    fn contextual_type(&self, node: NodeIndex) -> Option<OracleType> {
        self.arena.type_annotation_of(node).map(OracleType::Node)
    }

    fn is_assignable(&self, from: &OracleType, to: &OracleType) -> bool {
        // Only the trivial cases the resolver actually needs (identity,
        // and widening *from* `any`/`unknown`) are modeled; anything
        // else is conservatively not assignable so casts still validate.
        match (from, to) {
            (OracleType::Node(a), OracleType::Node(b)) => {
                a == b || self.same_primitive_name(*a, *b)
            }
            _ => false,
        }
    }

    fn members(&self, object_type: NodeIndex) -> Vec<(String, OracleType, bool)> {
        if self.arena.kind(object_type) != NodeKind::ObjectType {
            return Vec::new();
        }
        self.arena
            .children(object_type)
            .iter()
            .filter(|m| self.arena.kind(**m) == NodeKind::PropertySignature)
            .map(|m| {
                let name = self.arena.name(*m).unwrap_or_default().to_string();
                let optional = self.arena.flags(*m).optional;
                let ty = self.arena.children(*m)[0];
                (name, OracleType::Node(ty), optional)
            })
            .collect()
    }

    fn union_arms(&self, t: NodeIndex) -> Vec<OracleType> {
        if self.arena.kind(t) != NodeKind::UnionType {
            return Vec::new();
        }
        self.arena.children(t).iter().map(|c| OracleType::Node(*c)).collect()
    }

    fn is_generic_parameter(&self, _t: &OracleType) -> Option<Option<NodeIndex>> {
        None
    }
}

impl<'a> StructuralOracle<'a> {
    fn same_primitive_name(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.arena.kind(a) == NodeKind::PrimitiveType
            && self.arena.kind(b) == NodeKind::PrimitiveType
            && self.arena.primitive(a) == self.arena.primitive(b)
    }
}
