//! Grouping registrations into reusable modules.

use crate::container::Container;
use crate::error::CoreResult;

/// A named bundle of registrations.
///
/// Modules let independent features carry their own constants, providers,
/// and lifecycle callables, and be composed onto a container in one call.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, CoreModule, CoreResult, FactoryOptions, asset};
///
/// struct ClockModule;
///
/// impl CoreModule for ClockModule {
///     fn name(&self) -> &str {
///         "clock"
///     }
///
///     fn register(&self, core: &Container) -> CoreResult<()> {
///         core.constant("epoch", 0u64)?;
///         core.factory("now", FactoryOptions::new().inject(["epoch"]), |args| {
///             let epoch = args.get::<u64>(0)?;
///             Ok(asset(*epoch))
///         })?;
///         Ok(())
///     }
/// }
///
/// let core = Container::new();
/// core.add_module(&ClockModule).unwrap();
/// core.bootstrap().unwrap();
/// assert_eq!(*core.get_as::<u64>("now").unwrap(), 0);
/// ```
pub trait CoreModule {
    /// Stable name for diagnostics.
    fn name(&self) -> &str;

    /// Performs this module's registrations on `core`.
    fn register(&self, core: &Container) -> CoreResult<()>;
}

impl Container {
    /// Applies a module's registrations to this container.
    ///
    /// Registrations run immediately; a failing registration propagates and
    /// may leave the module partially applied, matching the behavior of the
    /// same calls made inline.
    pub fn add_module<M: CoreModule + ?Sized>(&self, module: &M) -> CoreResult<&Self> {
        module.register(self)?;
        Ok(self)
    }
}
