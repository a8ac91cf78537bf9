//! The container: registration surface, name-based resolution with upward
//! inheritance, and parent/child composition.

use std::cell::{Cell, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::time::Instant;

use once_cell::unsync::OnceCell;

use crate::bootstrap::Phase;
use crate::error::{CoreError, CoreResult};
use crate::internal::{ResolutionFrame, ResolutionState};
use crate::key::Key;
use crate::observer::CoreObserver;
use crate::provider::{
    AnyRc, CustomProvider, MaterializeFn, ProviderHandle, ProviderKind, ProviderRecord,
};
use crate::registration::{Args, ClassOptions, FactoryOptions, Injectable, Registry};

/// A dependency injection container.
///
/// Independent modules register named assets (constants, deferred values,
/// factories, classes, raw providers) and declare dependencies by name; the
/// container resolves them lazily, in declaration order, with cycle
/// detection. Containers compose into trees: lookup falls through to
/// ancestors, lifecycle sweeps cascade to descendants.
///
/// `Container` is a cheap `Rc` handle; clones share the same container.
/// The whole tree is single-threaded by design (`!Send`): all registration,
/// resolution, and bootstrap work runs to completion on the calling thread.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, FactoryOptions, asset};
///
/// let core = Container::new();
/// core.constant("url", "postgres://localhost".to_string()).unwrap();
/// core.factory(
///     "connection",
///     FactoryOptions::new().inject(["url"]).cache(true),
///     |args| {
///         let url = args.get::<String>(0)?;
///         Ok(asset(format!("connected to {}", url)))
///     },
/// )
/// .unwrap();
///
/// core.bootstrap().unwrap();
/// let conn = core.get_as::<String>("connection").unwrap();
/// assert_eq!(&*conn, "connected to postgres://localhost");
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Rc<ContainerInner>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("phase", &self.inner.phase.get())
            .finish_non_exhaustive()
    }
}

pub(crate) struct ContainerInner {
    // Strong upward, write-once; children are weak so the linkage cannot leak.
    pub(crate) parent: OnceCell<Container>,
    pub(crate) children: RefCell<Vec<Weak<ContainerInner>>>,
    pub(crate) registry: RefCell<Registry>,
    pub(crate) provider_queue: RefCell<Vec<Rc<ProviderRecord>>>,
    pub(crate) config_queue: RefCell<Vec<Injectable>>,
    pub(crate) run_queue: RefCell<Vec<Injectable>>,
    pub(crate) phase: Cell<Phase>,
    // Tree-wide resolution path; only the root's instance is used.
    pub(crate) resolution: RefCell<ResolutionState>,
    pub(crate) observers: RefCell<Vec<Rc<dyn CoreObserver>>>,
}

impl Container {
    /// Creates an empty root container.
    ///
    /// Every container seeds an `"injector"` asset resolving to an
    /// [`Injector`] bound to the requesting container.
    pub fn new() -> Self {
        let core = Self {
            inner: Rc::new(ContainerInner {
                parent: OnceCell::new(),
                children: RefCell::new(Vec::new()),
                registry: RefCell::new(Registry::new()),
                provider_queue: RefCell::new(Vec::new()),
                config_queue: RefCell::new(Vec::new()),
                run_queue: RefCell::new(Vec::new()),
                phase: Cell::new(Phase::NotStarted),
                resolution: RefCell::new(ResolutionState::default()),
                observers: RefCell::new(Vec::new()),
            }),
        };
        // The closure captures nothing; the injector is built fresh per
        // resolution against whichever container requested it.
        let record = ProviderRecord::new(
            "injector",
            ProviderKind::Custom,
            Vec::new(),
            false,
            Rc::new(|core: &Container| Ok(Rc::new(Injector::new(core.clone())) as AnyRc)),
        );
        core.inner.registry.borrow_mut().promote(record);
        core
    }

    fn check_id(id: &str) -> CoreResult<()> {
        if id.trim().is_empty() {
            return Err(CoreError::InvalidParameter(
                "identifier must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }

    fn check_keys(keys: &[Key]) -> CoreResult<()> {
        for key in keys {
            Self::check_id(key.id())?;
        }
        Ok(())
    }

    // ----- Registration surface -----

    /// Registers a fixed value, immediately available to `get`, `has`, and
    /// configure-phase code.
    ///
    /// # Errors
    ///
    /// [`DuplicateIdentifier`](CoreError::DuplicateIdentifier) if the
    /// identifier is already claimed in this container. Shadowing an
    /// ancestor's identifier is permitted and is not a collision.
    pub fn constant<T: 'static>(&self, id: &str, value: T) -> CoreResult<&Self> {
        self.constant_asset(id, Rc::new(value))
    }

    /// Registers several constants at once; fails fast per entry.
    pub fn constants<I, S>(&self, entries: I) -> CoreResult<&Self>
    where
        I: IntoIterator<Item = (S, AnyRc)>,
        S: AsRef<str>,
    {
        for (id, value) in entries {
            self.constant_asset(id.as_ref(), value)?;
        }
        Ok(self)
    }

    fn constant_asset(&self, id: &str, value: AnyRc) -> CoreResult<&Self> {
        Self::check_id(id)?;
        self.inner
            .registry
            .borrow_mut()
            .install(ProviderRecord::for_value(id, value))?;
        Ok(self)
    }

    /// Registers a deferred value.
    ///
    /// The identifier is claimed immediately, satisfying the duplicate check
    /// and [`has`](Self::has) queries, but the provider sits in the queue
    /// until the flush sweep of [`bootstrap`](Self::bootstrap) promotes it.
    /// Until then `get` cannot resolve it and falls through to ancestors.
    ///
    /// ```rust
    /// use wirecore::Container;
    ///
    /// let core = Container::new();
    /// core.value("answer", 42i32).unwrap();
    /// assert!(core.has("answer"));
    /// assert!(core.get("answer").is_err());
    ///
    /// core.bootstrap().unwrap();
    /// assert_eq!(*core.get_as::<i32>("answer").unwrap(), 42);
    /// ```
    pub fn value<T: 'static>(&self, id: &str, value: T) -> CoreResult<&Self> {
        self.value_asset(id, Rc::new(value))
    }

    /// Registers several deferred values at once; fails fast per entry.
    pub fn values<I, S>(&self, entries: I) -> CoreResult<&Self>
    where
        I: IntoIterator<Item = (S, AnyRc)>,
        S: AsRef<str>,
    {
        for (id, value) in entries {
            self.value_asset(id.as_ref(), value)?;
        }
        Ok(self)
    }

    fn value_asset(&self, id: &str, value: AnyRc) -> CoreResult<&Self> {
        Self::check_id(id)?;
        self.inner.registry.borrow_mut().claim(id)?;
        self.inner
            .provider_queue
            .borrow_mut()
            .push(ProviderRecord::for_value(id, value));
        Ok(self)
    }

    /// Registers a deferred factory.
    ///
    /// The factory's declared dependencies are resolved in order and handed
    /// to it as positional [`Args`] on every materialization, unless
    /// [`cache`](FactoryOptions::cache) pins the first result. Flushing the
    /// queue only promotes the provider; the factory body still waits for the
    /// first `get`.
    pub fn factory<F>(&self, id: &str, options: FactoryOptions, f: F) -> CoreResult<&Self>
    where
        F: Fn(&Args) -> CoreResult<AnyRc> + 'static,
    {
        Self::check_id(id)?;
        let FactoryOptions {
            inject,
            cache,
            with_new,
        } = options;
        Self::check_keys(&inject)?;
        let kind = if with_new {
            ProviderKind::Class
        } else {
            ProviderKind::Factory
        };
        let deps = inject.clone();
        // Dependencies resolve against the container the factory was
        // registered on, not the requester, so descendant shadows never leak
        // into an ancestor's factory. Weak here: the record lives inside this
        // container's registry, and any resolution reaching it holds a strong
        // chain up through the registering container.
        let home = Rc::downgrade(&self.inner);
        let materialize: MaterializeFn = Rc::new(move |core: &Container| {
            let host = home
                .upgrade()
                .map(|inner| Container { inner })
                .unwrap_or_else(|| core.clone());
            host.invoke(&inject, |args| f(args))
        });
        self.inner.registry.borrow_mut().claim(id)?;
        self.inner
            .provider_queue
            .borrow_mut()
            .push(ProviderRecord::new(id, kind, deps, cache, materialize));
        Ok(self)
    }

    /// Registers a deferred constructor: sugar for [`factory`](Self::factory)
    /// with constructor mode forced on.
    pub fn class<F>(&self, id: &str, options: ClassOptions, ctor: F) -> CoreResult<&Self>
    where
        F: Fn(&Args) -> CoreResult<AnyRc> + 'static,
    {
        let ClassOptions { inject, cache } = options;
        self.factory(
            id,
            FactoryOptions {
                inject,
                cache,
                with_new: true,
            },
            ctor,
        )
    }

    /// Registers a raw provider, synchronously.
    ///
    /// The factory runs immediately with an [`Injector`] bound to this
    /// container and must return a [`CustomProvider`] carrying a get
    /// function.
    ///
    /// # Errors
    ///
    /// [`MissingGetMethod`](CoreError::MissingGetMethod) if the returned
    /// provider has no get function, in addition to the usual duplicate and
    /// parameter checks.
    pub fn provide<F>(&self, id: &str, f: F) -> CoreResult<&Self>
    where
        F: FnOnce(&Injector) -> CustomProvider,
    {
        Self::check_id(id)?;
        let provider = f(&Injector::new(self.clone()));
        let get = provider
            .into_get()
            .ok_or_else(|| CoreError::MissingGetMethod(id.to_string()))?;
        let materialize: MaterializeFn =
            Rc::new(move |core: &Container| get(&Injector::new(core.clone())));
        self.inner
            .registry
            .borrow_mut()
            .install(ProviderRecord::new(
                id,
                ProviderKind::Custom,
                Vec::new(),
                false,
                materialize,
            ))?;
        Ok(self)
    }

    /// Queues a callable for the configure sweep.
    ///
    /// Dependencies declared with [`Key::provider`] receive the live
    /// [`ProviderHandle`] instead of the materialized value, letting startup
    /// code adjust a provider before any consumer resolves it.
    pub fn config<F>(&self, deps: Vec<Key>, f: F) -> CoreResult<&Self>
    where
        F: Fn(&Args) -> CoreResult<()> + 'static,
    {
        Self::check_keys(&deps)?;
        self.inner.config_queue.borrow_mut().push(Injectable {
            deps,
            call: Rc::new(f),
        });
        Ok(self)
    }

    /// Queues a callable for the run sweep.
    pub fn run<F>(&self, deps: Vec<Key>, f: F) -> CoreResult<&Self>
    where
        F: Fn(&Args) -> CoreResult<()> + 'static,
    {
        Self::check_keys(&deps)?;
        self.inner.run_queue.borrow_mut().push(Injectable {
            deps,
            call: Rc::new(f),
        });
        Ok(self)
    }

    // ----- Resolution surface -----

    /// Resolves an identifier to its materialized asset.
    ///
    /// Walks this container, then its ancestors; materializes the first
    /// matching provider (cached providers short-circuit). Re-entry on an
    /// identifier already being resolved fails with
    /// [`Cycle`](CoreError::Cycle) carrying the full path; the in-progress
    /// tracking unwinds with the error, so later calls start clean.
    pub fn get(&self, id: &str) -> CoreResult<AnyRc> {
        if self.inner.observers.borrow().is_empty() {
            return self.get_impl(id);
        }
        for observer in self.inner.observers.borrow().iter() {
            observer.resolving(id);
        }
        let start = Instant::now();
        let result = self.get_impl(id);
        match &result {
            Ok(_) => {
                let elapsed = start.elapsed();
                for observer in self.inner.observers.borrow().iter() {
                    observer.resolved(id, elapsed);
                }
            }
            Err(error) => {
                for observer in self.inner.observers.borrow().iter() {
                    observer.resolve_failed(id, error);
                }
            }
        }
        result
    }

    fn get_impl(&self, id: &str) -> CoreResult<AnyRc> {
        // Mark before recursing so self- and mutual references are caught at
        // the point of re-entry. The frame pops on every exit path.
        let _frame = ResolutionFrame::enter(self, id)?;
        let (_owner, record) = self
            .find_provider(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        record.materialize(self)
    }

    /// Resolves and downcasts an identifier.
    pub fn get_as<T: 'static>(&self, id: &str) -> CoreResult<Rc<T>> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| CoreError::TypeMismatch(id.to_string()))
    }

    /// Whether `id` is registered in this container or an ancestor.
    ///
    /// Never materializes. Claimed identifiers whose providers are still
    /// queued count as present, even though `get` cannot resolve them until
    /// the flush sweep.
    pub fn has(&self, id: &str) -> bool {
        let mut host = Some(self.clone());
        while let Some(core) = host {
            if core.inner.registry.borrow().contains(id) {
                return true;
            }
            host = core.parent();
        }
        false
    }

    /// Resolves `deps` in order and invokes `f` with the positional results.
    pub fn invoke<F>(&self, deps: &[Key], f: F) -> CoreResult<AnyRc>
    where
        F: FnOnce(&Args) -> CoreResult<AnyRc>,
    {
        let mut resolved = Vec::with_capacity(deps.len());
        for key in deps {
            resolved.push(self.resolve_key(key)?);
        }
        f(&Args::new(&resolved))
    }

    pub(crate) fn resolve_key(&self, key: &Key) -> CoreResult<AnyRc> {
        match key {
            Key::Asset(id) => self.get(id),
            Key::Provider(id) => {
                let (_owner, record) = self
                    .find_provider(id)
                    .ok_or_else(|| CoreError::NotFound(id.clone()))?;
                Ok(Rc::new(ProviderHandle::new(record, self.clone())) as AnyRc)
            }
        }
    }

    /// Nearest enclosing provider for `id`: self, then ancestors. Lookup
    /// never crosses into children.
    pub(crate) fn find_provider(&self, id: &str) -> Option<(Container, Rc<ProviderRecord>)> {
        let mut host = Some(self.clone());
        while let Some(core) = host {
            let found = core.inner.registry.borrow().get(id);
            if let Some(record) = found {
                return Some((core, record));
            }
            host = core.parent();
        }
        None
    }

    // ----- Hierarchical composition -----

    /// Creates a child container.
    ///
    /// The child's lookup falls through to this container; lifecycle sweeps
    /// started here cascade into the child. The parent holds only a weak
    /// link, so the caller owns the child's lifetime.
    ///
    /// ```rust
    /// use wirecore::Container;
    ///
    /// let core = Container::new();
    /// core.constant("shared", 1u8).unwrap();
    ///
    /// let child = core.create_child();
    /// assert!(child.has("shared"));
    /// assert!(!core.has("only_in_child"));
    /// ```
    pub fn create_child(&self) -> Container {
        let child = Container::new();
        let _ = child.inner.parent.set(self.clone());
        self.inner
            .children
            .borrow_mut()
            .push(Rc::downgrade(&child.inner));
        child
    }

    /// Attaches a pre-built container as a child.
    ///
    /// # Errors
    ///
    /// [`InvalidParameter`](CoreError::InvalidParameter) if the container
    /// already has a parent or is this container itself. The parent link is
    /// write-once.
    pub fn install(&self, child: &Container) -> CoreResult<&Self> {
        if Rc::ptr_eq(&self.inner, &child.inner) {
            return Err(CoreError::InvalidParameter(
                "cannot install a container into itself".to_string(),
            ));
        }
        child
            .inner
            .parent
            .set(self.clone())
            .map_err(|_| {
                CoreError::InvalidParameter("container already has a parent".to_string())
            })?;
        self.inner
            .children
            .borrow_mut()
            .push(Rc::downgrade(&child.inner));
        Ok(self)
    }

    /// This container's parent, if any.
    pub fn parent(&self) -> Option<Container> {
        self.inner.parent.get().cloned()
    }

    /// The root of this container's tree.
    pub(crate) fn root(&self) -> Container {
        let mut core = self.clone();
        while let Some(parent) = core.parent() {
            core = parent;
        }
        core
    }

    pub(crate) fn resolution_mut(&self) -> RefMut<'_, ResolutionState> {
        self.inner.resolution.borrow_mut()
    }

    /// Live children in creation order.
    pub(crate) fn children(&self) -> Vec<Container> {
        self.inner
            .children
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|inner| Container { inner })
            .collect()
    }

    // ----- Observability -----

    /// Adds a diagnostic observer for resolutions initiated at this
    /// container. Observer calls are synchronous; keep implementations
    /// lightweight.
    pub fn add_observer(&self, observer: Rc<dyn CoreObserver>) -> &Self {
        self.inner.observers.borrow_mut().push(observer);
        self
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write as _;

        let mut s = String::new();
        let _ = writeln!(s, "=== Container Debug ===");
        let _ = writeln!(s, "phase: {:?}", self.inner.phase.get());
        let _ = writeln!(s, "providers ({}):", self.inner.registry.borrow().len());
        for (id, slot) in self.inner.registry.borrow().iter() {
            match slot {
                Some(record) => {
                    let _ = writeln!(s, "  {}: {:?}", id, record.kind());
                }
                None => {
                    let _ = writeln!(s, "  {}: <queued>", id);
                }
            }
        }
        let _ = writeln!(
            s,
            "queues: provider={} config={} run={}",
            self.inner.provider_queue.borrow().len(),
            self.inner.config_queue.borrow().len(),
            self.inner.run_queue.borrow().len()
        );
        let _ = writeln!(s, "children: {}", self.children().len());
        s
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolution handle bound to one container.
///
/// Resolvable under the identifier `"injector"` from any container, and
/// passed into [`provide`](Container::provide) factory functions. Exposes the
/// resolution surface without exposing registration.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, Injector, Key};
///
/// let core = Container::new();
/// core.constant("id", 7u32).unwrap();
///
/// core.run(vec![Key::asset("injector")], |args| {
///     let injector = args.get::<Injector>(0)?;
///     assert!(injector.has("id"));
///     assert_eq!(*injector.get_as::<u32>("id")?, 7);
///     Ok(())
/// })
/// .unwrap();
///
/// core.bootstrap().unwrap();
/// ```
pub struct Injector {
    core: Container,
}

impl Injector {
    pub(crate) fn new(core: Container) -> Self {
        Self { core }
    }

    /// See [`Container::get`].
    pub fn get(&self, id: &str) -> CoreResult<AnyRc> {
        self.core.get(id)
    }

    /// See [`Container::get_as`].
    pub fn get_as<T: 'static>(&self, id: &str) -> CoreResult<Rc<T>> {
        self.core.get_as(id)
    }

    /// See [`Container::has`].
    pub fn has(&self, id: &str) -> bool {
        self.core.has(id)
    }

    /// See [`Container::invoke`].
    pub fn invoke<F>(&self, deps: &[Key], f: F) -> CoreResult<AnyRc>
    where
        F: FnOnce(&Args) -> CoreResult<AnyRc>,
    {
        self.core.invoke(deps, f)
    }
}
