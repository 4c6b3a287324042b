//! C5 `EditApplier`: splices `tsassert-planner` candidate sites and
//! `tsassert-synth` fragments into the original source buffer, and
//! emits a v3 source map describing the rewrite.

pub mod edit;
pub mod source_map;
pub mod vlq;

pub use edit::{apply_edits, AppliedEdits, ApplyOptions};
pub use source_map::{SourceMapGenerator, SourceMapV3};
