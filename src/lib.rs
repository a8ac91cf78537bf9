//! Minimal string-keyed dependency injection for single-threaded apps.
//!
//! `wirecore` lets independent features register named assets on a shared
//! [`Container`] and declare what they need by name, without importing each
//! other. Registration is cheap and order-free; materialization is lazy and
//! happens on first lookup, with optional caching and full-path cycle
//! errors. Containers compose into parent/child trees where lookup falls
//! through to ancestors, and a staged [`bootstrap`](Container::bootstrap)
//! (configure, flush providers, run) brings a whole tree up in a
//! deterministic order.
//!
//! Everything is single-threaded by design: assets are `Rc`-shared and the
//! container types are `!Send`. If you need a thread-safe container, this is
//! not it.
//!
//! # Quick start
//!
//! ```rust
//! use wirecore::{Container, FactoryOptions, Key, asset};
//!
//! let core = Container::new();
//!
//! core.constant("config", vec!["--verbose".to_string()]).unwrap();
//! core.value("answer", 42i32).unwrap();
//! core.factory(
//!     "report",
//!     FactoryOptions::new().inject(["config", "answer"]).cache(true),
//!     |args| {
//!         let config = args.get::<Vec<String>>(0)?;
//!         let answer = args.get::<i32>(1)?;
//!         Ok(asset(format!("{} flags, answer {}", config.len(), answer)))
//!     },
//! )
//! .unwrap();
//!
//! core.bootstrap_with(&[Key::asset("report")], |args| {
//!     assert_eq!(*args.get::<String>(0)?, "1 flags, answer 42");
//!     Ok(())
//! })
//! .unwrap();
//! ```

mod bootstrap;
mod container;
mod error;
mod internal;
mod key;
mod module;
mod observer;
mod provider;
mod registration;
mod validation;

pub use bootstrap::Phase;
pub use container::{Container, Injector};
pub use error::{CoreError, CoreResult};
pub use key::Key;
pub use module::CoreModule;
pub use observer::{CoreObserver, LoggingObserver};
pub use provider::{asset, AnyRc, CustomProvider, ProviderHandle, ProviderKind};
pub use registration::{Args, ClassOptions, FactoryOptions};
pub use validation::ValidationResult;

#[cfg(test)]
mod smoke {
    use super::*;

    #[test]
    fn constant_resolves_without_bootstrap() {
        let core = Container::new();
        core.constant("n", 5i32).unwrap();
        assert_eq!(*core.get_as::<i32>("n").unwrap(), 5);
    }

    #[test]
    fn injector_is_always_present() {
        let core = Container::new();
        assert!(core.has("injector"));
        let injector = core.get_as::<Injector>("injector").unwrap();
        assert!(injector.has("injector"));
    }

    #[test]
    fn missing_identifier_is_not_found() {
        let core = Container::new();
        match core.get("ghost") {
            Err(CoreError::NotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
