//! Internal infrastructure not exposed in the public API.

mod resolution;

pub(crate) use resolution::{ResolutionFrame, ResolutionState};
