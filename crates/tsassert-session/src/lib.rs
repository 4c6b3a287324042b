//! C6 `ProjectSession`: the long-lived host boundary around the
//! transform pipeline, plus the framed-JSON wire protocol hosts use to
//! drive it out-of-process (§4.6, §6 "Host-side lifecycle").

pub mod protocol;
pub mod session;
mod type_string;

pub use protocol::{handle_request, Command, Request, Response, ResponseError};
pub use session::{Flavor, ProjectSession, TransformResult, ValidationItem, ValidationKind, ValidationStatus};
