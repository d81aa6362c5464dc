//! Enumerated attributes of hotspot entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a known [`LocationKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid location type: {0} (expected fishing or hunting)")]
pub struct ParseLocationKindError(pub String);

/// What a location is used for.
///
/// Serialized as the lowercase name under the JSON key `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "location_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// A fishing spot.
    #[default]
    Fishing,
    /// A hunting spot.
    Hunting,
}

impl LocationKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 2] = [Self::Fishing, Self::Hunting];

    /// The wire/database name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fishing => "fishing",
            Self::Hunting => "hunting",
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LocationKind {
    type Err = ParseLocationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fishing" => Ok(Self::Fishing),
            "hunting" => Ok(Self::Hunting),
            _ => Err(ParseLocationKindError(s.to_owned())),
        }
    }
}
