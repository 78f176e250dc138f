//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Error returned when parsing an ID from a hex string fails.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid object id: {0}")]
pub struct IdParseError(String);

impl IdParseError {
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `bson::oid::ObjectId` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]` (stores as a
///   native `ObjectId` in BSON documents)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `new()` to mint a fresh ID, `parse()` from a 24-char hex string,
///   `to_hex()` for the wire representation
/// - `Display` and `FromStr` using the hex form
///
/// # Example
///
/// ```rust
/// # use tamarind_core::define_id;
/// define_id!(UserId);
/// define_id!(ProductId);
///
/// let user_id = UserId::new();
/// let product_id = ProductId::new();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::bson::oid::ObjectId);

        impl $name {
            /// Mint a new, unique ID.
            #[must_use]
            pub fn new() -> Self {
                Self(::bson::oid::ObjectId::new())
            }

            /// Parse an ID from its 24-character hex representation.
            ///
            /// # Errors
            ///
            /// Returns [`IdParseError`](crate::types::id::IdParseError) if
            /// the input is not a valid object id.
            pub fn parse(hex: &str) -> ::core::result::Result<Self, $crate::types::id::IdParseError> {
                ::bson::oid::ObjectId::parse_str(hex)
                    .map(Self)
                    .map_err(|e| $crate::types::id::IdParseError::new(e.to_string()))
            }

            /// Get the hex form used on the wire (JSON bodies, JWT claims).
            #[must_use]
            pub fn to_hex(&self) -> ::std::string::String {
                self.0.to_hex()
            }

            /// Get the underlying BSON object id.
            #[must_use]
            pub const fn as_object_id(&self) -> ::bson::oid::ObjectId {
                self.0
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdParseError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<::bson::oid::ObjectId> for $name {
            fn from(oid: ::bson::oid::ObjectId) -> Self {
                Self(oid)
            }
        }

        impl From<$name> for ::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
