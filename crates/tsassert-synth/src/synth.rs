//! The `Synthesize(TypeModel, mode) -> Fragment` contract (§4.2, §6
//! component C2). Owns the hoisted-helper table so structurally
//! identical validators collapse to one top-of-file function when
//! `reusableValidators` allows it, and enforces `maxGeneratedFunctions`.

use indexmap::IndexMap;
use tsassert_common::ReusableValidators;
use tsassert_common::limits::AUTO_HOIST_SIZE_THRESHOLD;
use tsassert_ir::{IrHash, IrNode, LowerMode};

use crate::emit_assert::emit_validator_fn;
use crate::emit_parsefilter::emit_parse_filter_fn;
use crate::emit_stringify::emit_stringify_fn;
use crate::escaping::{JSON_ESCAPE_HELPER_SRC, JSON_VALUE_HELPER_SRC};

/// A hoisted top-of-file helper, named after its content hash so two
/// identical fragments from different call sites collapse to one.
#[derive(Debug, Clone)]
pub struct HoistedHelper {
    pub name: String,
    pub source: String,
}

/// Output of one `synthesize` call: an expression the caller invokes as
/// `expr(value, pathLiteral)` (or `expr(value)` for Stringify), plus any
/// newly hoisted helpers the caller must insert at the top of the file.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub expr: String,
    pub new_helpers: Vec<HoistedHelper>,
}

fn helper_name(mode: LowerMode, hash: IrHash) -> String {
    let tag = match mode {
        LowerMode::Assert => "assert",
        LowerMode::ParseFilter => "parseFilter",
        LowerMode::Stringify => "stringify",
    };
    format!("_check_{tag}_{hash}")
}

/// Counts IR nodes reachable from `node`, used to decide auto-hoisting
/// independent of reuse count (§4.2 "Deduplication").
fn node_size(node: &IrNode) -> usize {
    match node {
        IrNode::CheckArray { elem, .. } => 1 + node_size(elem),
        IrNode::CheckTuple { elements, rest, .. } => {
            1 + elements.iter().map(|e| node_size(e)).sum::<usize>() + rest.as_ref().map(|r| node_size(r)).unwrap_or(0)
        }
        IrNode::Filter { fields, .. } | IrNode::Pure { fields, .. } => {
            1 + fields.iter().map(|f| node_size(&f.check)).sum::<usize>()
        }
        IrNode::CheckObject { fields, index, .. } => {
            1 + fields.iter().map(|f| node_size(&f.check)).sum::<usize>()
                + index.as_ref().map(|i| node_size(&i.value)).unwrap_or(0)
        }
        IrNode::CheckUnion { arms, .. } => 1 + arms.iter().map(|a| node_size(a)).sum::<usize>(),
        _ => 1,
    }
}

pub struct Synthesizer {
    policy: ReusableValidators,
    max_generated_functions: Option<usize>,
    helpers: IndexMap<(LowerMode, IrHash), HoistedHelper>,
    seen_once: std::collections::HashSet<(LowerMode, IrHash)>,
    runtime_helpers_emitted: bool,
}

impl Synthesizer {
    #[must_use]
    pub fn new(policy: ReusableValidators, max_generated_functions: Option<usize>) -> Self {
        Self {
            policy,
            max_generated_functions,
            helpers: IndexMap::new(),
            seen_once: std::collections::HashSet::new(),
            runtime_helpers_emitted: false,
        }
    }

    /// Hoisted helpers emitted so far, in insertion order (stable output
    /// ordering is required by P7).
    #[must_use]
    pub fn hoisted_helpers(&self) -> Vec<HoistedHelper> {
        self.helpers.values().cloned().collect()
    }

    fn emit_body(node: &IrNode, mode: LowerMode) -> String {
        match mode {
            LowerMode::Assert => emit_validator_fn(node),
            LowerMode::ParseFilter => emit_parse_filter_fn(node),
            LowerMode::Stringify => emit_stringify_fn(node),
        }
    }

    fn should_hoist(&mut self, key: (LowerMode, IrHash), node: &IrNode) -> bool {
        match self.policy {
            ReusableValidators::True => true,
            ReusableValidators::False => false,
            ReusableValidators::Auto => {
                if self.helpers.contains_key(&key) {
                    return true;
                }
                if !self.seen_once.insert(key) {
                    return true; // second sighting of this shape: hoist
                }
                node_size(node) >= AUTO_HOIST_SIZE_THRESHOLD
            }
        }
    }

    /// Synthesizes an invocable expression for `node` under `mode`. Call
    /// site callers (the planner) pass `site_name` purely for
    /// diagnostics; it does not affect the emitted code.
    pub fn synthesize(&mut self, node: &IrNode, mode: LowerMode, site_name: &str) -> Fragment {
        let hash = node.hash();
        let key = (mode, hash);
        let mut new_helpers = Vec::new();

        if !self.runtime_helpers_emitted && matches!(mode, LowerMode::Stringify) {
            new_helpers.push(HoistedHelper { name: "_jsonEscapeString".to_string(), source: JSON_ESCAPE_HELPER_SRC.to_string() });
            new_helpers.push(HoistedHelper { name: "_jsonValue".to_string(), source: JSON_VALUE_HELPER_SRC.to_string() });
            self.runtime_helpers_emitted = true;
        }

        if let Some(existing) = self.helpers.get(&key) {
            return Fragment { expr: existing.name.clone(), new_helpers };
        }

        let hoist = self.should_hoist(key, node);
        let body = Self::emit_body(node, mode);

        if hoist {
            if let Some(cap) = self.max_generated_functions {
                if self.helpers.len() >= cap {
                    // over budget: fall back to inlining this one call
                    // site rather than failing the transform outright.
                    return Fragment { expr: body, new_helpers };
                }
            }
            let name = helper_name(mode, hash);
            let source = format!("const {name} = {body};");
            let helper = HoistedHelper { name: name.clone(), source };
            self.helpers.insert(key, helper.clone());
            new_helpers.push(helper);
            let _ = site_name;
            Fragment { expr: name, new_helpers }
        } else {
            Fragment { expr: body, new_helpers }
        }
    }
}

#[cfg(test)]
#[path = "tests/synth.rs"]
mod tests;
