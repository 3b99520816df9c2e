//! core::naming
//!
//! Name sanitization for storage keys.
//!
//! # Rules
//!
//! Store and product names share one normalization:
//! - Lowercase
//! - Spaces become underscores
//! - Every character outside `[a-z0-9_]` is stripped
//!
//! The result may be empty; callers treat an empty result as an
//! invalid name.

/// Sanitize a user-supplied name into a storage key.
///
/// Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
///
/// # Example
///
/// ```
/// use turnstile::core::naming::sanitize;
///
/// assert_eq!(sanitize("My Shop"), "my_shop");
/// assert_eq!(sanitize("Epic Sword!"), "epic_sword");
/// assert_eq!(sanitize("!!!"), "");
/// ```
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == ' ' {
                '_'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}
