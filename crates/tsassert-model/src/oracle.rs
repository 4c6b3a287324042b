//! The `TypeOracle` boundary: the narrow interface the resolver needs
//! from a real TypeScript type checker. Out of scope per the system's
//! purpose (§6 names it an external collaborator); [`crate::structural_oracle`]
//! ships a concrete implementation reading annotations straight off the
//! `tsassert-syntax` AST, since this workspace has no host-supplied
//! checker to delegate to.

use tsassert_syntax::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub declaration: NodeIndex,
    pub exported: bool,
}

/// An oracle-level type description, one step less normalized than
/// `TypeModel`: it mirrors the AST type-annotation shapes (possibly
/// including generics and references) before canonicalisation.
#[derive(Debug, Clone)]
pub enum OracleType {
    Node(NodeIndex),
    GenericParameter { name: String, constraint: Option<NodeIndex> },
    Unresolvable(String),
}

/// The external capability the resolver depends on. A real host would
/// back this with a compiler's checker; [`crate::structural_oracle::StructuralOracle`]
/// is this crate's own implementation, reading type annotations
/// directly from parsed syntax (sufficient for a standalone crate with
/// no host compiler attached).
pub trait TypeOracle {
    fn type_at(&self, node: NodeIndex) -> OracleType;
    fn symbol_of(&self, node: NodeIndex) -> Option<Symbol>;
    fn contextual_type(&self, node: NodeIndex) -> Option<OracleType>;
    fn is_assignable(&self, from: &OracleType, to: &OracleType) -> bool;
    fn members(&self, object_type: NodeIndex) -> Vec<(String, OracleType, bool)>;
    fn union_arms(&self, t: NodeIndex) -> Vec<OracleType>;
    fn is_generic_parameter(&self, t: &OracleType) -> Option<Option<NodeIndex>>;
}
