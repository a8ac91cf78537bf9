//! Staged startup: configure, flush providers, run.
//!
//! Bootstrap walks to the highest not-yet-started ancestor and drives three
//! sweeps over that subtree, each visiting a container before its children:
//!
//! 1. **configure**: drain queued configure callables in registration order.
//!    Their dependencies resolve against immediately-registered providers
//!    only; queued providers have not been flushed yet.
//! 2. **flush providers**: promote every queued provider into its claimed
//!    registry slot.
//! 3. **run**: drain queued run callables, now with every provider visible.
//!
//! Phase transitions are monotonic, so bootstrapping an already-started tree
//! is a no-op apart from the caller's main callable.

use std::mem;

use crate::container::Container;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::registration::{Args, Injectable};

/// Lifecycle phase of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Configuring,
    FlushingProviders,
    Running,
    Started,
}

impl Container {
    /// Runs the three startup sweeps over this container's tree.
    ///
    /// Equivalent to [`bootstrap_with`](Self::bootstrap_with) with no main
    /// callable.
    pub fn bootstrap(&self) -> CoreResult<()> {
        self.bootstrap_with(&[], |_| Ok(()))
    }

    /// Runs the startup sweeps, then invokes `main` with `deps` resolved
    /// against this container.
    ///
    /// The sweeps start at the highest not-yet-started ancestor below any
    /// already-started one, so bootstrapping a child brings up its untouched
    /// ancestors first without reaching past a started container. `main`
    /// always runs, even when every container was already started.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wirecore::{Container, Key, asset};
    ///
    /// let core = Container::new();
    /// core.value("greeting", "hello".to_string()).unwrap();
    ///
    /// core.bootstrap_with(&[Key::asset("greeting")], |args| {
    ///     assert_eq!(*args.get::<String>(0)?, "hello");
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert!(core.is_started());
    /// ```
    pub fn bootstrap_with<F>(&self, deps: &[Key], main: F) -> CoreResult<()>
    where
        F: FnOnce(&Args) -> CoreResult<()>,
    {
        let start = self.start_root();
        start.configure_sweep()?;
        start.flush_sweep();
        start.run_sweep()?;

        let mut resolved = Vec::with_capacity(deps.len());
        for key in deps {
            resolved.push(self.resolve_key(key)?);
        }
        main(&Args::new(&resolved))
    }

    /// Whether this container has completed its run sweep.
    pub fn is_started(&self) -> bool {
        self.inner.phase.get() == Phase::Started
    }

    /// The container's current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Highest not-yet-started ancestor, falling back to `self`. The walk
    /// stops at the first started ancestor: anything above it was never
    /// brought up through this subtree and stays untouched.
    fn start_root(&self) -> Container {
        let mut start = self.clone();
        while let Some(parent) = start.parent() {
            if parent.inner.phase.get() != Phase::NotStarted {
                break;
            }
            start = parent;
        }
        start
    }

    fn configure_sweep(&self) -> CoreResult<()> {
        if self.inner.phase.get() == Phase::NotStarted {
            self.inner.phase.set(Phase::Configuring);
            // Callables may queue further configure work; keep draining until
            // the queue stays empty.
            loop {
                let batch = mem::take(&mut *self.inner.config_queue.borrow_mut());
                if batch.is_empty() {
                    break;
                }
                for item in batch {
                    self.invoke_configure(&item)?;
                }
            }
        }
        for child in self.children() {
            child.configure_sweep()?;
        }
        Ok(())
    }

    fn invoke_configure(&self, item: &Injectable) -> CoreResult<()> {
        let mut resolved = Vec::with_capacity(item.deps.len());
        for key in &item.deps {
            let value = self.resolve_key(key).map_err(|error| match error {
                // At this point queued providers are invisible; a miss here
                // usually means configure code asked for an unflushed value.
                CoreError::NotFound(id) => CoreError::ConfigDependency(id),
                other => other,
            })?;
            resolved.push(value);
        }
        (item.call)(&Args::new(&resolved))
    }

    fn flush_sweep(&self) {
        if self.inner.phase.get() == Phase::Configuring {
            self.inner.phase.set(Phase::FlushingProviders);
            let queued = mem::take(&mut *self.inner.provider_queue.borrow_mut());
            let mut registry = self.inner.registry.borrow_mut();
            for record in queued {
                registry.promote(record);
            }
        }
        for child in self.children() {
            child.flush_sweep();
        }
    }

    fn run_sweep(&self) -> CoreResult<()> {
        if self.inner.phase.get() == Phase::FlushingProviders {
            self.inner.phase.set(Phase::Running);
            loop {
                let batch = mem::take(&mut *self.inner.run_queue.borrow_mut());
                if batch.is_empty() {
                    break;
                }
                for item in batch {
                    let mut resolved = Vec::with_capacity(item.deps.len());
                    for key in &item.deps {
                        resolved.push(self.resolve_key(key)?);
                    }
                    (item.call)(&Args::new(&resolved))?;
                }
            }
            self.inner.phase.set(Phase::Started);
        }
        for child in self.children() {
            child.run_sweep()?;
        }
        Ok(())
    }
}
