//! Identifier types for paygate.
//!
//! Provider identifiers (`cus_...`, `card_...`, `tok_...`) are opaque. The
//! newtypes here keep them from being mixed up and guarantee they can be
//! interpolated into a request path without escaping.
//!
//! # Macro-based ID Types
//!
//! The `provider_id_type!` macro reduces boilerplate for string-backed
//! identifier types, ensuring consistent serialization, parsing, and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted identifier length.
pub const MAX_ID_LEN: usize = 255;

/// Macro to define a provider-assigned identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as string, validated)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `TryFrom<&str>`, `Into<String>`
/// - `AsRef<str>`
///
/// # Example
///
/// ```ignore
/// provider_id_type!(MyId, "A custom identifier type.");
/// let id: MyId = "obj_123".parse().unwrap();
/// ```
macro_rules! provider_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, validating its format.
            ///
            /// # Errors
            ///
            /// Returns an error if the id is empty, too long, or contains
            /// characters other than ASCII alphanumerics and `_`.
            pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
                let id = id.into();
                validate(&id)?;
                Ok(Self(id))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

provider_id_type!(CustomerId, "A customer identifier assigned by the payment provider (e.g. `cus_...`).");
provider_id_type!(SourceId, "A payment source identifier (e.g. `card_...`, `src_...`).\n\nCards are one kind of source; the same type names the default source of a customer.");
provider_id_type!(TokenId, "A single-use token identifier (e.g. `tok_...`).");

fn validate(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_ID_LEN {
        return Err(IdError::TooLong(id.len()));
    }
    if let Some(c) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(IdError::InvalidCharacter(c));
    }
    Ok(())
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty.
    #[error("identifier is empty")]
    Empty,

    /// The input exceeds [`MAX_ID_LEN`].
    #[error("identifier is too long ({0} bytes)")]
    TooLong(usize),

    /// The input contains a character that is not path safe.
    #[error("identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}
