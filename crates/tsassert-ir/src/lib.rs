//! The Validator IR (§3): a content-hashed DAG lowered from a
//! `TypeModel`, shared by `tsassert-synth`'s Assert/ParseFilter/
//! Stringify emission paths.

pub mod hash;
pub mod ir;
pub mod lower;

pub use ir::{IndexCheck, IrCache, IrHash, IrNode, LowerMode, ObjectCheckField};
pub use lower::lower;
