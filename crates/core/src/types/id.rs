//! Primary keys of the hotspots tables.
//!
//! Each table gets its own `i32` newtype so a location id can never be passed
//! where a user id is expected.

/// Declare an `i32` primary-key newtype.
///
/// The generated type is `Copy + Eq + Hash`, (de)serializes as a bare
/// integer, displays and parses as one, and maps to `INTEGER` columns when the
/// `postgres` feature is enabled.
///
/// ```rust
/// # use hotspots_core::define_id;
/// define_id!(
///     /// Primary key of a hypothetical `spots` table.
///     SpotId
/// );
///
/// let id: SpotId = "12".parse().unwrap();
/// assert_eq!(id.as_i32(), 12);
/// assert_eq!(serde_json::to_string(&id).unwrap(), "12");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Primary key of `users`; also the subject of a bearer token.
    UserId
);
define_id!(
    /// Primary key of `locations`.
    LocationId
);
define_id!(
    /// Primary key of `fish`.
    FishId
);
