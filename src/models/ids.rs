//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are opaque string tokens. New ones are generated from a random UUID,
//! but any non-empty string supplied by a store or an import is accepted
//! unchanged, so records created elsewhere keep their identity.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(format!("{}{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Wrap an existing token
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Get the underlying token
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form for tables: prefix plus the first 8 characters
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth($prefix.len() + 8)
                    .map(|(i, _)| i)
                    .unwrap_or(self.0.len());
                &self.0[..end]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().to_string()))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(ExpenseId, "exp-");
