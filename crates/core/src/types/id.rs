//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All shop identifiers
//! are short human-readable strings (`ORD-1718000000000`, `ff-100`, `ff-evo`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `matches()`
/// - `Display`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use topup_core::define_id;
/// define_id!(WidgetId);
///
/// let id = WidgetId::new("W-1");
/// assert!(id.matches("w-1"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Case-insensitive comparison against user-typed input.
            #[must_use]
            pub fn matches(&self, other: &str) -> bool {
                self.0.eq_ignore_ascii_case(other.trim())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(OrderId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(BannerId);
define_id!(NotificationId);

impl OrderId {
    /// Prefix of every generated order id.
    pub const PREFIX: &'static str = "ORD-";

    /// Build an order id from a millisecond timestamp (`ORD-<millis>`).
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}{millis}", Self::PREFIX))
    }
}

/// A buyer-supplied (or synthesized) proof-of-payment reference.
///
/// The value is always stored in normalized form: leading and trailing
/// whitespace removed, letters upper-cased. Uniqueness checks compare
/// normalized values only, so `" abc123 "` and `"ABC123"` are the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    /// Prefix of ids synthesized for administrator fast-fill orders.
    pub const ADMIN_PREFIX: &'static str = "ADMIN-";

    /// Normalize raw input into a transaction id.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Build a synthesized administrator id from a millisecond timestamp.
    #[must_use]
    pub fn synthesized(millis: i64) -> Self {
        Self(format!("{}{millis}", Self::ADMIN_PREFIX))
    }

    /// Returns the normalized id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the normalized id is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if this id was synthesized for a fast-fill order.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.0.starts_with(Self::ADMIN_PREFIX)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Records written by older builds may carry un-normalized ids.
impl From<String> for TransactionId {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}
