//! Centralized thresholds and limits.
//!
//! Grouping these in one module keeps the tuned constants from §9 of the
//! spec discoverable in one place instead of scattered across synthesis
//! and escape-analysis code.

/// Declared-leaf-key threshold (`K`) above which `JSON.stringify` synthesis
/// switches from a hand-rolled builder to `JSON.stringify(filter(v))`.
///
/// See spec §4.2 "StringifyProjection mode" and §9 "`JSON.stringify` builder".
pub const STRINGIFY_BUILDER_MAX_LEAVES: usize = 15;

/// Minimum IR-node count before a validator fragment is considered "large"
/// and hoisted under `reusableValidators = "auto"`, independent of reuse
/// count. See spec §4.2 "Deduplication".
pub const AUTO_HOIST_SIZE_THRESHOLD: usize = 6;

/// Maximum depth of nested object/array/union structure the synthesizer
/// will recurse into before degrading to a pass-through with a diagnostic.
/// Guards against runaway recursion on pathological or cyclic inputs that
/// slipped past `Reference` detection.
pub const MAX_TYPE_RECURSION_DEPTH: usize = 64;
