//! Arena-based AST.
//!
//! Scoped down from the teacher's `tsz-parser::NodeArena`/`NodeIndex`
//! design: one flat node table (`kind`, `span`, ordered `children`) plus a
//! handful of side tables for data that doesn't fit a uniform
//! parent/children shape (identifier text, literal values, optionality
//! flags, template chunks). Accessors document the children convention
//! per `NodeKind` so callers don't need to guess positional layout.

use crate::syntax_kind::NodeKind;
use rustc_hash::FxHashMap;
use tsassert_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveKind {
    #[default]
    Any,
    String,
    Number,
    Boolean,
    Bigint,
    Null,
    Undefined,
    Unknown,
    Never,
    Void,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bigint(String),
    Boolean(bool),
}

#[derive(Debug, Clone)]
pub enum TemplateChunk {
    Text(String),
    Placeholder(NodeIndex),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFlags {
    pub optional: bool,
    pub readonly: bool,
    pub is_async: bool,
    pub is_exported: bool,
    pub is_rest: bool,
}

struct NodeRecord {
    kind: NodeKind,
    span: Span,
    children: Vec<NodeIndex>,
}

/// The parsed AST for a single file, as a flat arena of nodes.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<NodeRecord>,

    names: FxHashMap<NodeIndex, String>,
    flags: FxHashMap<NodeIndex, NodeFlags>,
    literals: FxHashMap<NodeIndex, LiteralValue>,
    primitives: FxHashMap<NodeIndex, PrimitiveKind>,
    template_chunks: FxHashMap<NodeIndex, Vec<TemplateChunk>>,

    return_type_of: FxHashMap<NodeIndex, NodeIndex>,
    body_of: FxHashMap<NodeIndex, NodeIndex>,
    arrow_expr_body_of: FxHashMap<NodeIndex, NodeIndex>,
    type_annotation_of: FxHashMap<NodeIndex, NodeIndex>,
    initializer_of: FxHashMap<NodeIndex, NodeIndex>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(NodeRecord { kind, span, children: Vec::new() });
        idx
    }

    pub fn set_children(&mut self, idx: NodeIndex, children: Vec<NodeIndex>) {
        self.nodes[idx.0 as usize].children = children;
    }

    pub fn push_child(&mut self, idx: NodeIndex, child: NodeIndex) {
        self.nodes[idx.0 as usize].children.push(child);
    }

    pub fn kind(&self, idx: NodeIndex) -> NodeKind {
        self.nodes[idx.0 as usize].kind
    }

    pub fn span(&self, idx: NodeIndex) -> Span {
        self.nodes[idx.0 as usize].span
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.nodes[idx.0 as usize].children
    }

    pub fn set_name(&mut self, idx: NodeIndex, name: impl Into<String>) {
        self.names.insert(idx, name.into());
    }

    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.names.get(&idx).map(String::as_str)
    }

    pub fn set_flags(&mut self, idx: NodeIndex, flags: NodeFlags) {
        self.flags.insert(idx, flags);
    }

    pub fn flags(&self, idx: NodeIndex) -> NodeFlags {
        self.flags.get(&idx).copied().unwrap_or_default()
    }

    pub fn set_literal(&mut self, idx: NodeIndex, value: LiteralValue) {
        self.literals.insert(idx, value);
    }

    pub fn literal(&self, idx: NodeIndex) -> Option<&LiteralValue> {
        self.literals.get(&idx)
    }

    pub fn set_primitive(&mut self, idx: NodeIndex, p: PrimitiveKind) {
        self.primitives.insert(idx, p);
    }

    pub fn primitive(&self, idx: NodeIndex) -> PrimitiveKind {
        self.primitives.get(&idx).copied().unwrap_or(PrimitiveKind::Any)
    }

    pub fn set_template_chunks(&mut self, idx: NodeIndex, chunks: Vec<TemplateChunk>) {
        self.template_chunks.insert(idx, chunks);
    }

    pub fn template_chunks(&self, idx: NodeIndex) -> &[TemplateChunk] {
        self.template_chunks.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_return_type(&mut self, fn_idx: NodeIndex, ty: NodeIndex) {
        self.return_type_of.insert(fn_idx, ty);
    }

    pub fn return_type_of(&self, fn_idx: NodeIndex) -> Option<NodeIndex> {
        self.return_type_of.get(&fn_idx).copied()
    }

    pub fn set_body(&mut self, fn_idx: NodeIndex, body: NodeIndex) {
        self.body_of.insert(fn_idx, body);
    }

    pub fn body_of(&self, fn_idx: NodeIndex) -> Option<NodeIndex> {
        self.body_of.get(&fn_idx).copied()
    }

    pub fn set_arrow_expr_body(&mut self, fn_idx: NodeIndex, expr: NodeIndex) {
        self.arrow_expr_body_of.insert(fn_idx, expr);
    }

    pub fn arrow_expr_body_of(&self, fn_idx: NodeIndex) -> Option<NodeIndex> {
        self.arrow_expr_body_of.get(&fn_idx).copied()
    }

    pub fn set_type_annotation(&mut self, idx: NodeIndex, ty: NodeIndex) {
        self.type_annotation_of.insert(idx, ty);
    }

    pub fn type_annotation_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.type_annotation_of.get(&idx).copied()
    }

    pub fn set_initializer(&mut self, idx: NodeIndex, init: NodeIndex) {
        self.initializer_of.insert(idx, init);
    }

    pub fn initializer_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.initializer_of.get(&idx).copied()
    }

    /// Parameters of a function-like node, in declaration order.
    /// Convention: `children(fn_idx)` for `FunctionDeclaration` /
    /// `ArrowFunctionExpression` IS the parameter list.
    pub fn params_of(&self, fn_idx: NodeIndex) -> &[NodeIndex] {
        self.children(fn_idx)
    }
}
