//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_code!` macro to create type-safe wrappers around the
//! string codes the warehouse system uses everywhere (catalog item codes,
//! company codes, warehouse codes), preventing them from being mixed up.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string-code wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use almacen_core::define_code;
/// define_code!(ItemId);
/// define_code!(WarehouseCode);
///
/// let item = ItemId::new("2-2100");
/// let warehouse = WarehouseCode::new("ALM001");
///
/// // These are different types, so this won't compile:
/// // let _: ItemId = warehouse;
/// ```
#[macro_export]
macro_rules! define_code {
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
            /// Create a new code from anything string-like.
            #[must_use]
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self(code.to_string())
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self(code)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> Self {
                code.0
            }
        }
    };
}

// Define standard entity codes
define_code!(ItemId);
define_code!(CompanyCode);
define_code!(WarehouseCode);

/// Four-digit code identifying one transfer request.
///
/// The web layer generates a random 1000-9999 code for each new draft;
/// this type only guarantees the value is printable and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestCode(u16);

impl RequestCode {
    /// Create a new request code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for RequestCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for RequestCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}
