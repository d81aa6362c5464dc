//! Core types for Hotspots.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod position;
pub mod status;
pub mod text;

pub use email::{Email, EmailError};
pub use id::*;
pub use position::{Position, PositionError, check_latitude, check_longitude};
pub use status::*;
pub use text::{Truncated, fits, truncate_chars};
