//! Newtype IDs for type-safe entity references.
//!
//! Pricetator identifiers are opaque strings: user IDs come from the identity
//! provider's `sub` claim and history entry IDs are derived from the owning user
//! and a timestamp. Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use pricetator_core::define_id;
/// define_id!(UserId);
/// define_id!(EntryId);
///
/// let user_id = UserId::new("1234");
/// let entry_id = EntryId::new("1234");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = entry_id;
/// assert_eq!(user_id.as_str(), entry_id.as_str());
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
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id!(UserId);
define_id!(HistoryEntryId);

impl HistoryEntryId {
    /// Derive an entry ID from the owning user and a timestamp in microseconds.
    ///
    /// The timestamp is rendered as `seconds.micros` so IDs read like the
    /// timestamps they were built from.
    #[must_use]
    pub fn derive(user_id: &UserId, timestamp_micros: i64) -> Self {
        let seconds = timestamp_micros.div_euclid(1_000_000);
        let micros = timestamp_micros.rem_euclid(1_000_000);
        Self(format!("{user_id}_{seconds}.{micros:06}"))
    }
}
