//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CallerId`] - Identity of a human operator (string-form numeric ID)
//! - [`ExternalId`] - Numeric identifier in the external system
//! - [`StoreName`] - Sanitized store key
//! - [`ProductName`] - Sanitized product key
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs. Names are
//! sanitized on construction, so a `StoreName` is always a usable
//! storage key.
//!
//! # Examples
//!
//! ```
//! use turnstile::core::types::{CallerId, ExternalId, StoreName};
//!
//! let caller = CallerId::new("1205959966511603802").unwrap();
//! let id = ExternalId::new(123);
//! let store = StoreName::new("My Shop").unwrap();
//! assert_eq!(store.as_str(), "my_shop");
//!
//! assert!(CallerId::new("not-numeric").is_err());
//! assert!(StoreName::new("!!!").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::naming::sanitize;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid name: {0:?} has no usable characters after sanitization")]
    InvalidName(String),

    #[error("invalid caller identity: {0:?} (expected a numeric ID)")]
    InvalidCallerId(String),

    #[error("invalid external identifier: {0:?} (expected a non-negative integer)")]
    InvalidExternalId(String),
}

/// A caller identity: the string form of a numeric operator ID.
///
/// Caller identities arrive from the chat-platform gateway as strings
/// and are stored as strings, but must parse as non-negative integers.
///
/// # Example
///
/// ```
/// use turnstile::core::types::CallerId;
///
/// let id = CallerId::new("42").unwrap();
/// assert_eq!(id.as_str(), "42");
///
/// assert!(CallerId::new("").is_err());
/// assert!(CallerId::new("abc").is_err());
/// assert!(CallerId::new("-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallerId(String);

impl CallerId {
    /// Create a caller identity, validating the numeric form.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(TypeError::InvalidCallerId(raw));
        }
        Ok(Self(raw))
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CallerId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CallerId> for String {
    fn from(value: CallerId) -> Self {
        value.0
    }
}

/// A numeric identifier in the external system.
///
/// Serialized as a plain JSON number, matching the persisted file
/// format.
///
/// # Example
///
/// ```
/// use turnstile::core::types::ExternalId;
///
/// let id = ExternalId::new(123);
/// assert_eq!(id.value(), 123);
///
/// let parsed = ExternalId::parse("123").unwrap();
/// assert_eq!(parsed, id);
/// assert!(ExternalId::parse("12a").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExternalId(u64);

impl ExternalId {
    /// Create an external identifier from its numeric value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parse an external identifier from its decimal string form.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        raw.parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidExternalId(raw.to_string()))
    }

    /// Get the numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated store key.
///
/// Construction sanitizes the raw name (lowercase, spaces to
/// underscores, strip everything outside `[a-z0-9_]`) and rejects
/// names that sanitize to nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreName(String);

impl StoreName {
    /// Create a store name, applying sanitization.
    ///
    /// # Example
    ///
    /// ```
    /// use turnstile::core::types::StoreName;
    ///
    /// let name = StoreName::new("My Shop").unwrap();
    /// assert_eq!(name.as_str(), "my_shop");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        let key = sanitize(raw);
        if key.is_empty() {
            return Err(TypeError::InvalidName(raw.to_string()));
        }
        Ok(Self(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StoreName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoreName> for String {
    fn from(value: StoreName) -> Self {
        value.0
    }
}

/// A validated product key. Uniqueness is per-store; sanitization is
/// identical to [`StoreName`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Create a product name, applying sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        let key = sanitize(raw);
        if key.is_empty() {
            return Err(TypeError::InvalidName(raw.to_string()));
        }
        Ok(Self(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductName> for String {
    fn from(value: ProductName) -> Self {
        value.0
    }
}
