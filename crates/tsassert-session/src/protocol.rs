//! The request/response wire protocol hosts speak to the transformer
//! (§6 "Transformer API (exposed to hosts)"), framed as length-prefixed
//! JSON over stdin/stdout by `tsassert-cli` ("Host-side lifecycle").
//! This module only defines the message shapes and the dispatch from a
//! `Request` to a `ProjectSession` call; framing itself is the CLI's job.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tsassert_common::CoreError;
use tsassert_edit::SourceMapV3;

use crate::session::{Flavor, ProjectSession, ValidationItem};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Transform,
    Analyze,
    Close,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub flavor: Flavor,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<SourceMapV3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ValidationItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseError {
    pub code: &'static str,
    pub message: String,
}

impl From<&CoreError> for ResponseError {
    fn from(err: &CoreError) -> Self {
        let code = match err {
            CoreError::Config(_) => "config",
            CoreError::Project(_) => "project",
            CoreError::Parse { .. } => "parse",
            CoreError::Internal(_) => "internal",
        };
        Self { code, message: err.to_string() }
    }
}

/// Dispatches one request to `session`, never panicking: every
/// `CoreError` becomes a response `error` field rather than aborting
/// the host loop, except that a fatal `ConfigError` can only originate
/// at `ProjectSession::open`, before any request reaches here.
pub fn handle_request(session: &mut ProjectSession, request: &Request) -> Response {
    let path = Path::new(&request.path);
    match request.command {
        Command::Transform => match session.transform(path, request.flavor) {
            Ok(result) => Response { code: Some(result.code), source_map: result.source_map, ..Response::default() },
            Err(err) => Response { error: Some((&err).into()), ..Response::default() },
        },
        Command::Analyze => match session.analyze(path) {
            Ok(items) => Response { items: Some(items), ..Response::default() },
            Err(err) => Response { error: Some((&err).into()), ..Response::default() },
        },
        Command::Close => {
            session.close();
            Response::default()
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol.rs"]
mod tests;
