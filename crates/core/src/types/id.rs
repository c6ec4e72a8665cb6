//! Newtype IDs for type-safe entity references.
//!
//! The marketplace backend identifies every entity with a UUID. Use the
//! `define_id!` macro to create wrappers that prevent accidentally passing a
//! category ID where a product ID is expected.

/// Macro to define a type-safe UUID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_uuid()`
/// - `FromStr` (hyphenated UUID text) and `Display`
///
/// # Example
///
/// ```rust
/// # use seller_panel_core::define_id;
/// define_id!(SellerId);
/// define_id!(OrderId);
///
/// let seller_id: SellerId = "7f1c2b6e-3a55-4c1e-9a0b-55f1d0b2c3d4".parse().unwrap();
/// assert_eq!(seller_id.to_string(), "7f1c2b6e-3a55-4c1e-9a0b-55f1d0b2c3d4");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = seller_id;
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
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Marketplace entity IDs
define_id!(SellerId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(AttachmentId);
