//! Business logic services for the hotspots API.
//!
//! # Services
//!
//! - `auth` - Signup and login (Argon2id password hashes)
//! - `token` - Bearer token issue and verification (JWT)

pub mod auth;
pub mod token;

pub use auth::{AuthError, AuthService, Signup};
pub use token::{TokenError, TokenService};
