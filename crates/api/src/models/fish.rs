//! Fish species domain types.

use serde::Serialize;

use hotspots_core::FishId;

/// Width of the `fish.name` column.
pub const NAME_MAX_LEN: usize = 100;
/// Width of the `fish.wiki_link` and `fish.image_link` columns.
pub const LINK_MAX_LEN: usize = 255;

/// A fish species entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fish {
    pub id: FishId,
    pub name: String,
    pub wiki_link: Option<String>,
    pub image_link: Option<String>,
}

/// Everything needed to insert a fish species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFish {
    pub name: String,
    pub wiki_link: Option<String>,
    pub image_link: Option<String>,
}

impl NewFish {
    /// Attach the inserted id.
    #[must_use]
    pub fn into_fish(self, id: FishId) -> Fish {
        Fish {
            id,
            name: self.name,
            wiki_link: self.wiki_link,
            image_link: self.image_link,
        }
    }
}
