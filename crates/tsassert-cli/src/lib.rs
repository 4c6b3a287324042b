//! Shared plumbing for the `tsassert` and `tsassert-server` binaries:
//! tracing setup and the request/response JSON shape the one-shot
//! subcommands print, kept in a library crate so both binaries and the
//! integration tests can reuse it without duplicating code.

pub mod args;
pub mod tracing_config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use tsassert_session::{Flavor, ProjectSession};

/// What the `transform`/`analyze` one-shot subcommands print on success.
/// Distinct from `tsassert_session::protocol::Response`: this is a
/// human/tool-facing report, not a framed-protocol reply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneShotReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<tsassert_edit::SourceMapV3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<tsassert_session::ValidationItem>>,
}

pub fn run_transform(session: &mut ProjectSession, path: &PathBuf, flavor: Flavor) -> Result<OneShotReport> {
    let result = session
        .transform(path, flavor)
        .with_context(|| format!("failed to transform {}", path.display()))?;
    Ok(OneShotReport { file: path.display().to_string(), code: Some(result.code), source_map: result.source_map, items: None })
}

pub fn run_analyze(session: &mut ProjectSession, path: &PathBuf) -> Result<OneShotReport> {
    let items = session.analyze(path).with_context(|| format!("failed to analyze {}", path.display()))?;
    Ok(OneShotReport { file: path.display().to_string(), code: None, source_map: None, items: Some(items) })
}

#[cfg(test)]
#[path = "tests/lib.rs"]
mod tests;
