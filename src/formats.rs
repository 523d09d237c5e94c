mod json;
mod payload;

pub use json::JsonError;
pub use payload::{parse_rig, RigParseError, RigParseResult};
