//! `ProjectSession` (§4.4 component C6): the long-lived host boundary.
//! Owns the loaded-file cache and the session's `TransformerOptions`,
//! and drives one file at a time through parse → plan → apply (§5:
//! "within one session `Transform` calls are serialised").

use std::path::{Path, PathBuf};

use globset::GlobSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use tsassert_common::{CoreError, LineMap, TransformerOptions};
use tsassert_edit::{apply_edits, ApplyOptions, SourceMapV3};
use tsassert_flow::{Decision, SiteKind};
use tsassert_planner::{CandidateSite, PlannerOptions, PlanResult, SitePlanner};

use crate::type_string;

/// Which grammar subset to parse a file under. The current
/// `tsassert-syntax` parser does not distinguish them (§9 Open
/// Question: a real `.js` front-end would reject type annotations);
/// both flavors share the one subset-TS grammar for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Ts,
    Js,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub code: String,
    pub source_map: Option<SourceMapV3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationKind {
    Parameter,
    Return,
    Cast,
    JsonParse,
    JsonStringify,
}

impl From<SiteKind> for ValidationKind {
    fn from(kind: SiteKind) -> Self {
        match kind {
            SiteKind::Parameter => ValidationKind::Parameter,
            SiteKind::Return => ValidationKind::Return,
            SiteKind::Cast => ValidationKind::Cast,
            SiteKind::JsonParse => ValidationKind::JsonParse,
            SiteKind::JsonStringify => ValidationKind::JsonStringify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Validated,
    Skipped,
}

/// One row of `Analyze`'s report (§6 "`ValidationItem`"). Lines are
/// 1-based, columns 0-based, matching the spec's mixed convention.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationItem {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub kind: ValidationKind,
    pub name: String,
    pub status: ValidationStatus,
    pub type_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl ValidationItem {
    fn from_site(site: &CandidateSite, line_map: &LineMap) -> Self {
        let (start, end) = line_map.span_to_range(site.byte_span);
        let type_string = site.expected_type.as_deref().map(type_string::render).unwrap_or_else(|| "unknown".to_string());
        let Decision { validate, reason } = &site.decision;
        ValidationItem {
            start_line: start.line + 1,
            start_column: start.column,
            end_line: end.line + 1,
            end_column: end.column,
            kind: site.kind.into(),
            name: site.name.clone(),
            status: if *validate { ValidationStatus::Validated } else { ValidationStatus::Skipped },
            type_string,
            skip_reason: reason.clone(),
        }
    }
}

pub struct ProjectSession {
    options: TransformerOptions,
    project_root: PathBuf,
    include: Option<GlobSet>,
    exclude: GlobSet,
    files: FxHashMap<PathBuf, String>,
    closed: bool,
}

impl ProjectSession {
    /// Opens a session rooted at `config_path`'s directory (or the
    /// current directory when `None`), loading `TransformerOptions`
    /// from that path if it exists. A malformed config file is a
    /// `ConfigError`, the one failure mode that is fatal for the
    /// session (§7).
    pub fn open(config_path: Option<&Path>) -> Result<Self, CoreError> {
        let (options, project_root) = match config_path {
            Some(path) => {
                let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
                let options = if path.exists() {
                    let text = std::fs::read_to_string(path)
                        .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;
                    serde_json::from_str(&text).map_err(|e| CoreError::Config(format!("invalid config at {}: {e}", path.display())))?
                } else {
                    TransformerOptions::default()
                };
                (options, root)
            }
            None => {
                let cwd = std::env::current_dir().map_err(|e| CoreError::Config(e.to_string()))?;
                (TransformerOptions::default(), cwd)
            }
        };

        let (include, exclude) = options.compile_globs().map_err(|e| CoreError::Config(e.to_string()))?;
        tracing::debug!(root = %project_root.display(), "session opened");
        Ok(Self { options, project_root, include, exclude, files: FxHashMap::default(), closed: false })
    }

    pub fn close(&mut self) {
        self.files.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn options(&self) -> &TransformerOptions {
        &self.options
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.closed {
            return Err(CoreError::Internal("session is closed".to_string()));
        }
        Ok(())
    }

    fn in_scope(&self, rel: &Path) -> bool {
        if self.exclude.is_match(rel) {
            return false;
        }
        match &self.include {
            Some(set) => set.is_match(rel),
            None => true,
        }
    }

    fn load_file(&mut self, abs_path: &Path) -> Result<String, CoreError> {
        let rel = abs_path.strip_prefix(&self.project_root).unwrap_or(abs_path);
        if !self.in_scope(rel) {
            return Err(CoreError::Project(format!("source file not found: {}", abs_path.display())));
        }
        if let Some(cached) = self.files.get(abs_path) {
            return Ok(cached.clone());
        }
        let content = std::fs::read_to_string(abs_path)
            .map_err(|_| CoreError::Project(format!("source file not found: {}", abs_path.display())))?;
        self.files.insert(abs_path.to_path_buf(), content.clone());
        Ok(content)
    }

    /// Parses `source` and runs `SitePlanner` over it. A resolver
    /// failure here fails only this file's request (the session and
    /// other files stay usable), matching §7's "errors that pertain to
    /// a file fail only that request".
    fn plan_file(&self, source: &str, abs_path: &Path) -> Result<PlanResult, CoreError> {
        let parsed = tsassert_syntax::parse(source).map_err(|e| CoreError::Parse {
            file: abs_path.display().to_string(),
            message: e.message,
        })?;
        let planner_options = PlannerOptions::from_transformer_options(&self.options);
        let mut planner = SitePlanner::new(&parsed, planner_options);
        planner.plan()
    }

    pub fn transform(&mut self, abs_path: &Path, _flavor: Flavor) -> Result<TransformResult, CoreError> {
        self.ensure_open()?;
        let source = self.load_file(abs_path)?;
        let plan = self.plan_file(&source, abs_path)?;
        tracing::debug!(file = %abs_path.display(), sites = plan.sites.len(), "planned");

        let effective_inline = self.options.source_map.enabled && self.options.source_map.inline;
        let apply_options = ApplyOptions {
            generated_file: generated_file_name(abs_path),
            source_file: abs_path.display().to_string(),
            include_content: self.options.source_map.include_content,
            inline: effective_inline,
        };
        let applied = apply_edits(&source, &plan.sites, &plan.reference_stubs, &apply_options)?;
        let source_map = if self.options.source_map.enabled && !effective_inline { applied.source_map } else { None };
        Ok(TransformResult { code: applied.code, source_map })
    }

    pub fn analyze(&mut self, abs_path: &Path) -> Result<Vec<ValidationItem>, CoreError> {
        self.ensure_open()?;
        let source = self.load_file(abs_path)?;
        let plan = self.plan_file(&source, abs_path)?;
        let line_map = LineMap::build(&source);
        Ok(plan.sites.iter().map(|site| ValidationItem::from_site(site, &line_map)).collect())
    }
}

fn generated_file_name(abs_path: &Path) -> String {
    let stem = abs_path.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    format!("{stem}.js")
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
