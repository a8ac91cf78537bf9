//! Resolution observers.
//!
//! Observers hook the resolution path for diagnostics. They only fire for
//! `get` calls made on the container they were added to, and the observer
//! dispatch is skipped entirely while the list is empty, so an unobserved
//! container pays nothing.

use std::time::Duration;

use crate::error::CoreError;

/// Callback surface for resolution events.
///
/// All methods default to no-ops; implement the ones you care about.
pub trait CoreObserver {
    /// A resolution for `id` is about to start.
    fn resolving(&self, _id: &str) {}

    /// The resolution for `id` succeeded after `elapsed`.
    fn resolved(&self, _id: &str, _elapsed: Duration) {}

    /// The resolution for `id` failed.
    fn resolve_failed(&self, _id: &str, _error: &CoreError) {}
}

/// Observer that prints resolution events to stderr.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use wirecore::{Container, LoggingObserver};
///
/// let core = Container::new();
/// core.constant("name", "demo".to_string()).unwrap();
/// core.add_observer(Rc::new(LoggingObserver));
/// core.get("name").unwrap();
/// ```
pub struct LoggingObserver;

impl CoreObserver for LoggingObserver {
    fn resolving(&self, id: &str) {
        eprintln!("[wirecore] resolving \"{}\"", id);
    }

    fn resolved(&self, id: &str, elapsed: Duration) {
        eprintln!("[wirecore] resolved \"{}\" in {:?}", id, elapsed);
    }

    fn resolve_failed(&self, id: &str, error: &CoreError) {
        eprintln!("[wirecore] failed \"{}\": {}", id, error);
    }
}
