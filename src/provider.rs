//! Provider records: the resolution strategies bound to identifiers.
//!
//! Every registered identifier is backed by a [`ProviderRecord`] holding a
//! materialize closure, an optional cache slot, and a kind tag. Records are
//! created by the registration front-ends on [`Container`](crate::Container)
//! and consumed by resolution; they are never removed.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::container::{Container, Injector};
use crate::error::CoreResult;
use crate::key::Key;

/// Type-erased asset shared within a single-threaded container tree.
pub type AnyRc = Rc<dyn Any>;

/// Wraps a plain value as a type-erased asset.
///
/// Convenience for the bulk registration front-ends which take uniform
/// `(id, AnyRc)` pairs.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, asset};
///
/// let core = Container::new();
/// core.constants([("host", asset("localhost".to_string())), ("port", asset(8080u16))])
///     .unwrap();
/// assert_eq!(*core.get_as::<u16>("port").unwrap(), 8080);
/// ```
pub fn asset<T: 'static>(value: T) -> AnyRc {
    Rc::new(value)
}

pub(crate) type MaterializeFn = Rc<dyn Fn(&Container) -> CoreResult<AnyRc>>;

/// Kind tag stored on every provider record.
///
/// The kind is fixed at registration time and never inferred dynamically:
/// `factory` registrations with constructor mode become [`ProviderKind::Class`],
/// everything else keeps the kind of the front-end that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Fixed value, registered by `constant` or `value`
    Value,
    /// Callable invoked with resolved dependencies
    Factory,
    /// Constructor-style factory (`with_new` / `class`)
    Class,
    /// Raw provider registered through `provide`
    Custom,
}

/// One resolution strategy bound to one identifier.
pub(crate) struct ProviderRecord {
    id: String,
    kind: ProviderKind,
    // Swappable so configure-phase code can replace it through a handle.
    materialize: RefCell<MaterializeFn>,
    // Present iff the registration asked for caching.
    cache: Option<OnceCell<AnyRc>>,
    deps: Vec<Key>,
}

impl ProviderRecord {
    pub(crate) fn new(
        id: impl Into<String>,
        kind: ProviderKind,
        deps: Vec<Key>,
        cached: bool,
        materialize: MaterializeFn,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: id.into(),
            kind,
            materialize: RefCell::new(materialize),
            cache: cached.then(OnceCell::new),
            deps,
        })
    }

    /// Record for a fixed value; materialization clones the stored `Rc`.
    pub(crate) fn for_value(id: impl Into<String>, value: AnyRc) -> Rc<Self> {
        Self::new(
            id,
            ProviderKind::Value,
            Vec::new(),
            false,
            Rc::new(move |_| Ok(value.clone())),
        )
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub(crate) fn deps(&self) -> &[Key] {
        &self.deps
    }

    /// Runs the record's materialize closure. `core` is the requesting
    /// container; factory records ignore it in favor of their registering
    /// container, raw providers and the injector bind to it.
    ///
    /// Cache-enabled records return the identical instance after the first
    /// call; errors are never cached.
    pub(crate) fn materialize(&self, core: &Container) -> CoreResult<AnyRc> {
        match &self.cache {
            Some(cell) => {
                if let Some(value) = cell.get() {
                    return Ok(value.clone());
                }
                // Drop the borrow before running the closure: the factory may
                // re-enter the container and reach this record's handle.
                let f = self.materialize.borrow().clone();
                let value = f(core)?;
                Ok(cell.get_or_init(|| value.clone()).clone())
            }
            None => {
                let f = self.materialize.borrow().clone();
                f(core)
            }
        }
    }

    pub(crate) fn swap_materialize(&self, f: MaterializeFn) {
        *self.materialize.borrow_mut() = f;
    }
}

/// Live handle to a registered provider.
///
/// Configure-phase callables that declare a dependency with
/// [`Key::provider`](crate::Key::provider) receive one of these instead of the
/// materialized value, bound to the container the configure sweep ran on.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, CustomProvider, Key, ProviderHandle, asset};
///
/// let core = Container::new();
/// core.provide("greeting", |_| {
///     CustomProvider::from_get(|_| Ok(asset("hello".to_string())))
/// })
/// .unwrap();
///
/// core.config(vec![Key::provider("greeting")], |args| {
///     let handle = args.get::<ProviderHandle>(0)?;
///     handle.set_value("goodbye".to_string());
///     Ok(())
/// })
/// .unwrap();
///
/// core.bootstrap().unwrap();
/// assert_eq!(*core.get_as::<String>("greeting").unwrap(), "goodbye");
/// ```
pub struct ProviderHandle {
    record: Rc<ProviderRecord>,
    core: Container,
}

impl ProviderHandle {
    pub(crate) fn new(record: Rc<ProviderRecord>, core: Container) -> Self {
        Self { record, core }
    }

    /// The identifier this provider is registered under.
    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// The provider's kind tag.
    pub fn kind(&self) -> ProviderKind {
        self.record.kind()
    }

    /// Materializes the provider through the owning container.
    ///
    /// Goes through the full resolution path, so cycle detection and caching
    /// apply exactly as they would for a plain `get`.
    pub fn get(&self) -> CoreResult<AnyRc> {
        self.core.get(self.record.id())
    }

    /// Replaces the materialization with a fixed value.
    ///
    /// Intended for configure-phase overrides. Has no effect on a cached
    /// record that already materialized, which the bootstrap ordering makes
    /// unreachable for queue-flushed providers.
    pub fn set_value<T: 'static>(&self, value: T) {
        let value: AnyRc = Rc::new(value);
        self.record
            .swap_materialize(Rc::new(move |_| Ok(value.clone())));
    }

    /// Replaces the materialization with a new get function.
    pub fn set_get<F>(&self, f: F)
    where
        F: Fn(&Injector) -> CoreResult<AnyRc> + 'static,
    {
        self.record
            .swap_materialize(Rc::new(move |core| f(&Injector::new(core.clone()))));
    }
}

/// Raw provider built by a [`provide`](crate::Container::provide) factory.
///
/// The factory must attach a get function; registering a `CustomProvider`
/// without one fails with
/// [`MissingGetMethod`](crate::CoreError::MissingGetMethod).
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, CustomProvider, asset};
///
/// let core = Container::new();
/// core.constant("base", 40i64).unwrap();
/// core.provide("answer", |_| {
///     CustomProvider::from_get(|injector| {
///         let base = injector.get_as::<i64>("base")?;
///         Ok(asset(*base + 2))
///     })
/// })
/// .unwrap();
///
/// assert_eq!(*core.get_as::<i64>("answer").unwrap(), 42);
/// ```
#[derive(Default)]
pub struct CustomProvider {
    get: Option<Rc<dyn Fn(&Injector) -> CoreResult<AnyRc>>>,
}

impl CustomProvider {
    /// An empty provider with no get function; registration will reject it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider materializing through the given get function.
    pub fn from_get<F>(f: F) -> Self
    where
        F: Fn(&Injector) -> CoreResult<AnyRc> + 'static,
    {
        Self {
            get: Some(Rc::new(f)),
        }
    }

    pub(crate) fn into_get(self) -> Option<Rc<dyn Fn(&Injector) -> CoreResult<AnyRc>>> {
        self.get
    }
}
