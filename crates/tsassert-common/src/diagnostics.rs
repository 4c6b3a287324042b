//! Diagnostic types and the error taxonomy from spec §7.

use crate::span::Span;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// A single diagnostic tied to a file and span, used both for
/// `ResolveWarning`-style skip reasons and for reporting parse failures.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            file: file.into(),
            span,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            file: file.into(),
            span,
            message: message.into(),
        }
    }
}

/// The error taxonomy from spec §7.
///
/// `ResolveWarning` is deliberately not an `Error` variant here: per spec it
/// "never fails the transform" and is recorded as a `skipReason` on the
/// affected `ValidationItem` rather than propagated. Only variants that can
/// actually fail a session or a single request are represented.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("source file not found: {0}")]
    Project(String),

    #[error("parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    #[must_use]
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, CoreError::Config(_))
    }
}
