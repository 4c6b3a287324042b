//! Transformer configuration (spec §6 "Configuration").
//!
//! Mirrors the teacher's `CheckerOptions` pattern: a plain `Default`-able
//! struct, loaded from a JSON config file by the session layer, with
//! per-field `#[serde(default)]` so unlisted/future keys round-trip rather
//! than failing deserialization (spec §9, Open Question on config surface).

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

/// `reusableValidators` setting (spec §6 and §4.2 "Deduplication").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReusableValidators {
    /// Always hoist into a top-of-file `const _check_<hash> = ...`.
    True,
    /// Always inline.
    False,
    /// Hoist when a fragment is reused or larger than the tuned size
    /// threshold (`AUTO_HOIST_SIZE_THRESHOLD`).
    Auto,
}

impl Default for ReusableValidators {
    fn default() -> Self {
        ReusableValidators::Auto
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub include_content: bool,
    #[serde(default)]
    pub inline: bool,
}

fn default_true() -> bool {
    true
}

impl SourceMapOptions {
    #[must_use]
    pub fn enabled_default() -> Self {
        Self {
            enabled: true,
            include_content: true,
            inline: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformerOptions {
    pub validate_casts: bool,
    pub reusable_validators: ReusableValidators,
    pub ignore_types: Vec<String>,
    pub max_generated_functions: Option<usize>,
    pub source_map: SourceMapOptions,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub debug_write_intermediate_files: bool,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        Self {
            validate_casts: true,
            reusable_validators: ReusableValidators::Auto,
            ignore_types: Vec::new(),
            max_generated_functions: None,
            source_map: SourceMapOptions::enabled_default(),
            include: Vec::new(),
            exclude: Vec::new(),
            debug_write_intermediate_files: false,
        }
    }
}

impl TransformerOptions {
    /// Compile `include`/`exclude` glob lists into matchable sets.
    /// Empty `include` means "everything under the project roots".
    pub fn compile_globs(&self) -> Result<(Option<GlobSet>, GlobSet), globset::Error> {
        let include = if self.include.is_empty() {
            None
        } else {
            let mut b = GlobSetBuilder::new();
            for pat in &self.include {
                b.add(Glob::new(pat)?);
            }
            Some(b.build()?)
        };
        let mut exclude_builder = GlobSetBuilder::new();
        for pat in &self.exclude {
            exclude_builder.add(Glob::new(pat)?);
        }
        Ok((include, exclude_builder.build()?))
    }

    #[must_use]
    pub fn ignores_type(&self, qualified_name: &str) -> bool {
        self.ignore_types.iter().any(|t| t == qualified_name)
    }
}
