//! `Synthesize(TypeModel, mode) -> Fragment` (§4.2, component C2). Lowers
//! a `tsassert_model::TypeModel` to `tsassert_ir::IrNode` (see
//! `tsassert-ir`) then emits JavaScript for one of three modes:
//! assertion guards, `JSON.parse` whitelist filtering, or `JSON.stringify`
//! key projection - hoisting fragments into shared top-of-file helpers
//! per the `reusableValidators` policy.

pub mod emit_assert;
pub mod emit_parsefilter;
pub mod emit_stringify;
pub mod escaping;
pub mod synth;

pub use emit_assert::emit_validator_fn;
pub use emit_parsefilter::emit_parse_filter_fn;
pub use emit_stringify::emit_stringify_fn;
pub use synth::{Fragment, HoistedHelper, Synthesizer};
