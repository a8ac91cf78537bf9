//! Cycle detection for in-progress resolutions.
//!
//! The resolution chain is tree-wide state owned by the root container and is
//! only ever touched through [`ResolutionFrame`] scope guards. Every frame is
//! popped when it drops, on the success path and on every error exit alike,
//! so no tracking state can leak across independent `get` calls.

use crate::container::Container;
use crate::error::{CoreError, CoreResult};

/// Ordered path of identifiers currently being resolved in one container tree.
#[derive(Default)]
pub(crate) struct ResolutionState {
    path: Vec<String>,
}

/// Scope guard marking one identifier as in progress.
pub(crate) struct ResolutionFrame {
    root: Container,
    id: String,
}

impl ResolutionFrame {
    /// Pushes `id` onto the tree's resolution path.
    ///
    /// The cycle check runs before the push, so re-entry on an in-progress
    /// identifier is caught at the point of re-entry and the returned error
    /// carries the full traversal path including the repeated identifier.
    pub(crate) fn enter(core: &Container, id: &str) -> CoreResult<Self> {
        let root = core.root();
        {
            let mut state = root.resolution_mut();
            if state.path.iter().any(|in_progress| in_progress == id) {
                let mut path = state.path.clone();
                path.push(id.to_string());
                return Err(CoreError::Cycle(path));
            }
            state.path.push(id.to_string());
        }
        Ok(Self {
            root,
            id: id.to_string(),
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        let mut state = self.root.resolution_mut();
        if let Some(last) = state.path.pop() {
            debug_assert_eq!(last, self.id);
        }
    }
}
