//! Registration internals: the per-container provider table, queued
//! callables, and the positional argument view handed to them.

use std::any::type_name;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::provider::{AnyRc, ProviderHandle, ProviderRecord};

/// Per-container identifier table.
///
/// A `None` entry means the identifier is claimed (registered through a
/// deferred front-end) but its record still sits in the provider queue.
/// Claimed entries count for the duplicate check and for `contains`, yet
/// yield no record until the flush sweep promotes them.
#[derive(Default)]
pub(crate) struct Registry {
    providers: HashMap<String, Option<Rc<ProviderRecord>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn assert_free(&self, id: &str) -> CoreResult<()> {
        if self.providers.contains_key(id) {
            return Err(CoreError::DuplicateIdentifier(id.to_string()));
        }
        Ok(())
    }

    /// Claims an identifier for a queued provider.
    pub(crate) fn claim(&mut self, id: &str) -> CoreResult<()> {
        self.assert_free(id)?;
        self.providers.insert(id.to_string(), None);
        Ok(())
    }

    /// Registers a record immediately (constant / provide front-ends).
    pub(crate) fn install(&mut self, record: Rc<ProviderRecord>) -> CoreResult<()> {
        self.assert_free(record.id())?;
        self.providers.insert(record.id().to_string(), Some(record));
        Ok(())
    }

    /// Promotes a queued record into its claimed slot during the flush sweep.
    pub(crate) fn promote(&mut self, record: Rc<ProviderRecord>) {
        self.providers.insert(record.id().to_string(), Some(record));
    }

    /// A flushed record for the identifier, if any. Claimed-but-queued
    /// entries report `None` so lookup falls through to ancestors.
    pub(crate) fn get(&self, id: &str) -> Option<Rc<ProviderRecord>> {
        self.providers.get(id).and_then(|slot| slot.clone())
    }

    /// Whether the identifier is claimed or installed here.
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, Option<&Rc<ProviderRecord>>)> {
        self.providers
            .iter()
            .map(|(id, slot)| (id.as_str(), slot.as_ref()))
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }
}

/// A callable stored together with its dependency declaration.
///
/// The declaration is kept beside the callable, never attached to it.
pub(crate) struct Injectable {
    pub(crate) deps: Vec<Key>,
    pub(crate) call: Rc<dyn Fn(&Args) -> CoreResult<()>>,
}

/// Positional view over resolved dependencies.
///
/// The arguments appear in declaration order. Typed access downcasts the
/// type-erased assets back to their concrete types.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, FactoryOptions, asset};
///
/// let core = Container::new();
/// core.constant("name", "wirecore".to_string()).unwrap();
/// core.factory(
///     "banner",
///     FactoryOptions::new().inject(["name"]),
///     |args| {
///         let name = args.get::<String>(0)?;
///         Ok(asset(format!("== {} ==", name)))
///     },
/// )
/// .unwrap();
/// core.bootstrap().unwrap();
///
/// assert_eq!(*core.get_as::<String>("banner").unwrap(), "== wirecore ==");
/// ```
pub struct Args<'a> {
    values: &'a [AnyRc],
}

impl<'a> Args<'a> {
    pub(crate) fn new(values: &'a [AnyRc]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument at `index`, downcast to `T`.
    pub fn get<T: 'static>(&self, index: usize) -> CoreResult<Rc<T>> {
        let value = self.values.get(index).ok_or_else(|| {
            CoreError::InvalidParameter(format!(
                "argument index {} out of bounds ({} injected)",
                index,
                self.values.len()
            ))
        })?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| CoreError::TypeMismatch(format!("argument {} as {}", index, type_name::<T>())))
    }

    /// The argument at `index` as a provider handle.
    ///
    /// Only arguments declared with [`Key::provider`](crate::Key::provider)
    /// carry a handle.
    pub fn provider(&self, index: usize) -> CoreResult<Rc<ProviderHandle>> {
        self.get::<ProviderHandle>(index)
    }

    /// The raw type-erased argument at `index`.
    pub fn raw(&self, index: usize) -> Option<&AnyRc> {
        self.values.get(index)
    }
}

/// Options for [`factory`](crate::Container::factory) registrations.
#[derive(Default, Clone)]
pub struct FactoryOptions {
    pub(crate) inject: Vec<Key>,
    pub(crate) cache: bool,
    pub(crate) with_new: bool,
}

impl FactoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the dependencies resolved and injected, in order.
    pub fn inject<I, K>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.inject = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Caches the first materialized result for all later resolutions.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Records the callable as constructor-style.
    pub fn with_new(mut self, with_new: bool) -> Self {
        self.with_new = with_new;
        self
    }
}

/// Options for [`class`](crate::Container::class) registrations.
#[derive(Default, Clone)]
pub struct ClassOptions {
    pub(crate) inject: Vec<Key>,
    pub(crate) cache: bool,
}

impl ClassOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the constructor's dependencies, in order.
    pub fn inject<I, K>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.inject = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Caches the first constructed instance.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}
