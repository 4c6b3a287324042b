//! `SitePlanner` (§4.4, component C4): the pass that ties `TypeModel`
//! resolution, escape analysis, and validator synthesis together into
//! an ordered list of `CandidateSite`s for one parsed file.

pub mod plan;
pub mod site;
pub mod walk;

pub use plan::{PlannerOptions, PlanResult, ReferenceStub, SitePlanner};
pub use site::CandidateSite;
