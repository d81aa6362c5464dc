//! Domain models for the hotspots API.
//!
//! Each model's `Serialize` impl is its JSON projection. Insert forms
//! (`New*`) carry the same fields minus the database id.

pub mod fish;
pub mod location;
pub mod user;

pub use fish::{Fish, NewFish};
pub use location::{Location, NewLocation};
pub use user::{LocationAssociationUpdate, NewUser, User};
