//! Dependency addressing for the container.

use std::fmt;

/// Addresses one entry of a dependency declaration.
///
/// A callable declares what it needs as an ordered list of keys. Each key
/// names an identifier and states which form of it the callable wants:
///
/// - [`Key::Asset`] — the materialized value produced by the provider
/// - [`Key::Provider`] — the provider handle itself, without materializing
///
/// Requesting the provider handle is only meaningful during the configure
/// phase, where startup code is allowed to adjust a provider before any
/// consumer resolves it.
///
/// # Examples
///
/// ```rust
/// use wirecore::Key;
///
/// let value = Key::asset("db");
/// let handle = Key::provider("db");
///
/// assert_eq!(value.id(), "db");
/// assert_eq!(handle.id(), "db");
/// assert!(!value.wants_provider());
/// assert!(handle.wants_provider());
///
/// // Plain strings convert to asset keys.
/// let from_str: Key = "db".into();
/// assert_eq!(from_str, value);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// The materialized value of an identifier
    Asset(String),
    /// The provider handle registered for an identifier
    Provider(String),
}

impl Key {
    /// Creates a key requesting the materialized value.
    pub fn asset(id: impl Into<String>) -> Self {
        Key::Asset(id.into())
    }

    /// Creates a key requesting the provider handle.
    pub fn provider(id: impl Into<String>) -> Self {
        Key::Provider(id.into())
    }

    /// The identifier this key addresses.
    pub fn id(&self) -> &str {
        match self {
            Key::Asset(id) | Key::Provider(id) => id,
        }
    }

    /// Whether this key asks for the provider handle rather than its product.
    pub fn wants_provider(&self) -> bool {
        matches!(self, Key::Provider(_))
    }
}

impl From<&str> for Key {
    fn from(id: &str) -> Self {
        Key::Asset(id.to_string())
    }
}

impl From<String> for Key {
    fn from(id: String) -> Self {
        Key::Asset(id)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Asset(id) => write!(f, "{}", id),
            Key::Provider(id) => write!(f, "{} (provider)", id),
        }
    }
}
