//! The escape & purity analysis (§4.3, component C3): classifies each
//! binding as `Clean`/`Dirty`/`Escaped` via an intra-procedural forward
//! dataflow pass, then turns that into a `MUST-VALIDATE`/`SKIP`
//! decision per candidate site kind.

pub mod analyzer;
pub mod decision;
pub mod lattice;

pub use analyzer::{is_json_parse_call, is_json_stringify_call, EscapeAnalyzer, FunctionAnalysis};
pub use decision::{decide_cast, decide_json_parse, decide_json_stringify, decide_parameter, decide_return, Decision, SiteKind};
pub use lattice::Fact;
