//! Per-site-kind skip rules (§4.3 "Rules by site kind") and the
//! `MUST-VALIDATE | SKIP` decision carried back to `SitePlanner`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Parameter,
    Return,
    Cast,
    JsonParse,
    JsonStringify,
}

/// `SKIP` always carries a textual reason - surfaced through `Analyze`
/// for the IDE extension (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub validate: bool,
    pub reason: Option<String>,
}

impl Decision {
    #[must_use]
    pub fn validate() -> Self {
        Self { validate: true, reason: None }
    }

    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self { validate: false, reason: Some(reason.into()) }
    }
}

use crate::lattice::Fact;

/// Parameters always validate at function entry, except an internal
/// (non-exported) function whose every call site is known, within this
/// analysis, to pass only `Clean` arguments. Cross-file callers of an
/// exported function are assumed conservative (Dirty), so `exported`
/// alone forces MUST-VALIDATE.
#[must_use]
pub fn decide_parameter(exported: bool, all_call_sites_pass_clean: bool) -> Decision {
    if !exported && all_call_sites_pass_clean {
        Decision::skip("internal function; every call site passes an already-validated value")
    } else {
        Decision::validate()
    }
}

/// SKIP iff the returned expression is Clean at the return point.
#[must_use]
pub fn decide_return(fact: Fact) -> Decision {
    match fact {
        Fact::Clean => Decision::skip("returned value is already validated (clean) at this point"),
        Fact::Dirty => Decision::validate(),
        Fact::Escaped => Decision::validate(),
    }
}

/// `x as T` validates unless the oracle proves `x`'s static type is
/// already assignable to `T` without widening from `any`/`unknown`.
#[must_use]
pub fn decide_cast(source_is_top_type: bool, statically_assignable: bool) -> Decision {
    if !source_is_top_type && statically_assignable {
        Decision::skip("source type is already statically assignable to the cast target")
    } else {
        Decision::validate()
    }
}

/// `JSON.parse` always validates; there is no prior run-time proof of
/// shape for freshly parsed data.
#[must_use]
pub fn decide_json_parse() -> Decision {
    Decision::validate()
}

/// `JSON.stringify` validates by key-projection when a declared
/// object/array type is available to project against; otherwise the
/// call passes through untouched.
#[must_use]
pub fn decide_json_stringify(has_declared_type: bool) -> Decision {
    if has_declared_type {
        Decision::validate()
    } else {
        Decision::skip("no declared object/array type available to project against")
    }
}

#[cfg(test)]
#[path = "tests/decision.rs"]
mod tests;
