//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use serde::Serialize;

use hotspots_core::{Email, LocationId, UserId};

/// A site user (domain type).
///
/// The password hash is never part of this type, so serializing a `User`
/// cannot leak it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name chosen at signup.
    pub user_name: String,
    /// Optional home zipcode.
    pub zipcode: Option<i32>,
}

/// Everything needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2id PHC string, never the plaintext.
    pub password_hash: String,
    pub user_name: String,
    pub zipcode: Option<i32>,
}

/// Replacement of one of a user's location associations.
///
/// Each variant carries the complete new list of location ids; ids that do
/// not resolve to a location are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationAssociationUpdate {
    /// Replace the set of liked locations.
    Liked(Vec<LocationId>),
    /// Replace the set of locations the user created.
    Added(Vec<LocationId>),
}

impl LocationAssociationUpdate {
    /// JSON field name of the liked-locations association.
    pub const LIKED_FIELD: &'static str = "liked_locations";
    /// JSON field name of the added-locations association.
    pub const ADDED_FIELD: &'static str = "added_locations";

    /// Build an update from a request field name, if the field is updatable.
    #[must_use]
    pub fn for_field(field: &str, ids: Vec<LocationId>) -> Option<Self> {
        match field {
            Self::LIKED_FIELD => Some(Self::Liked(ids)),
            Self::ADDED_FIELD => Some(Self::Added(ids)),
            _ => None,
        }
    }

    /// The request field this update came from.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Liked(_) => Self::LIKED_FIELD,
            Self::Added(_) => Self::ADDED_FIELD,
        }
    }

    /// The requested location ids.
    #[must_use]
    pub fn ids(&self) -> &[LocationId] {
        match self {
            Self::Liked(ids) | Self::Added(ids) => ids,
        }
    }
}
