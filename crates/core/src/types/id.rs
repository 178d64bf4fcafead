//! Newtype IDs for type-safe entity references.
//!
//! The remote API identifies customers and shops by integer keys that are
//! embedded in request paths. Wrapping them keeps a shop id from ever being
//! passed where a customer id is expected.

/// Define a type-safe ID wrapper around `i64`.
///
/// The generated type is `Copy`, serde-transparent, displays as the bare
/// number and converts to and from `i64`.
///
/// # Example
///
/// ```rust
/// # use laundry_core::define_id;
/// define_id!(TicketId);
///
/// let id = TicketId::new(7);
/// assert_eq!(id.to_string(), "7");
/// assert_eq!(i64::from(id), 7);
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
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CustomerId);
define_id!(ShopId);
