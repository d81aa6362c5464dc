//! Location domain types.

use serde::Serialize;

use hotspots_core::{LocationId, LocationKind, Position, UserId};

/// Width of the `locations.name` column.
pub const NAME_MAX_LEN: usize = 100;
/// Width of the `locations.directions` column.
pub const DIRECTIONS_MAX_LEN: usize = 255;

/// A fishing or hunting spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub position: Position,
    pub directions: Option<String>,
    /// User who added the location, if any.
    pub creator_id: Option<UserId>,
}

/// Everything needed to insert a location.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub name: String,
    pub kind: LocationKind,
    pub position: Position,
    pub directions: Option<String>,
    pub creator_id: Option<UserId>,
}

impl NewLocation {
    /// Attach the inserted id.
    #[must_use]
    pub fn into_location(self, id: LocationId) -> Location {
        Location {
            id,
            name: self.name,
            kind: self.kind,
            position: self.position,
            directions: self.directions,
            creator_id: self.creator_id,
        }
    }
}
