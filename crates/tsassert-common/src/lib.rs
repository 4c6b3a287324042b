//! Common types and utilities shared across tsassert crates.
//!
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`)
//! - Line/column position mapping (`LineMap`, `Position`)
//! - Diagnostics and the error taxonomy (`Diagnostic`, `CoreError`)
//! - Centralized tuned limits (`limits`)
//! - Session/transform configuration (`TransformerOptions`)

pub mod config;
pub mod diagnostics;
pub mod limits;
pub mod position;
pub mod span;

pub use config::{ReusableValidators, SourceMapOptions, TransformerOptions};
pub use diagnostics::{CoreError, Diagnostic, DiagnosticCategory};
pub use position::{LineMap, Position};
pub use span::{Span, SpanBuilder, Spanned};
