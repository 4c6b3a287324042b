//! The `CandidateSite` shape (§3): one entry per place a validator may
//! be injected, in source order, carrying the resolved type and the
//! MUST-VALIDATE/SKIP verdict `EscapeAnalyzer` reached for it.

use std::sync::Arc;

use tsassert_common::Span;
use tsassert_flow::{Decision, SiteKind};
use tsassert_model::TypeModel;
use tsassert_synth::Fragment;

/// One candidate injection point.
#[derive(Debug, Clone)]
pub struct CandidateSite {
    pub kind: SiteKind,

    /// The span of the construct this site concerns: a parameter, a
    /// `return` expression, a cast expression, or a `JSON.parse`/
    /// `JSON.stringify` call.
    pub byte_span: Span,

    /// Where `EditApplier` acts. For `Parameter` this is a zero-width
    /// point just inside the body's opening brace; for every other kind
    /// it equals `byte_span` (the expression is replaced in place).
    pub insertion: Span,

    /// Parameter name, `"return"`, or the callee text, for diagnostics.
    pub name: String,

    /// `None` when no declared/resolvable type was available to check
    /// against (an unconstrained generic, or a `JSON.stringify` target
    /// whose argument has no locally declared type).
    pub expected_type: Option<Arc<TypeModel>>,

    pub decision: Decision,

    /// `Some` exactly when `decision.validate` is `true`.
    pub fragment: Option<Fragment>,
}

impl CandidateSite {
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.decision.validate
    }
}
