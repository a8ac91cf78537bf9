//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during asset registration,
/// resolution, or bootstrap in wirecore.
///
/// # Examples
///
/// ```rust
/// use wirecore::{Container, CoreError};
///
/// let core = Container::new();
/// match core.get("missing") {
///     Err(CoreError::NotFound(id)) => assert_eq!(id, "missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use wirecore::CoreError;
///
/// let cycle = CoreError::Cycle(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(cycle.to_string(), r#"cyclic dependency "a -> b -> a""#);
/// ```
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Identifier already claimed in the same container
    DuplicateIdentifier(String),
    /// No provider for the identifier anywhere in the container chain
    NotFound(String),
    /// Resolution revisited an in-progress identifier (includes full path)
    Cycle(Vec<String>),
    /// A `provide` factory returned a provider without a get function
    MissingGetMethod(String),
    /// Malformed arguments to a registration call
    InvalidParameter(String),
    /// A configure-phase dependency could not be resolved
    ConfigDependency(String),
    /// Asset downcast failed
    TypeMismatch(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::DuplicateIdentifier(id) => {
                write!(f, "\"{}\" has already been registered", id)
            }
            CoreError::NotFound(id) => write!(f, "dependency \"{}\" not found", id),
            CoreError::Cycle(path) => {
                write!(f, "cyclic dependency \"{}\"", path.join(" -> "))
            }
            CoreError::MissingGetMethod(id) => {
                write!(f, "\"{}\" provider needs a get function", id)
            }
            CoreError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            CoreError::ConfigDependency(id) => {
                write!(f, "config dependency \"{}\" not found or illegal", id)
            }
            CoreError::TypeMismatch(id) => write!(f, "type mismatch for \"{}\"", id),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type for container operations
///
/// A convenience alias for `Result<T, CoreError>` used throughout wirecore,
/// following the common Rust pattern of a crate-specific Result type to
/// reduce boilerplate in signatures.
///
/// # Examples
///
/// ```rust
/// use wirecore::{CoreResult, CoreError};
///
/// fn lookup() -> CoreResult<String> {
///     Err(CoreError::NotFound("db".to_string()))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type CoreResult<T> = Result<T, CoreError>;
