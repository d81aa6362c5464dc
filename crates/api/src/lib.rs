//! Hotspots API library.
//!
//! The JSON API for the fishing and hunting location directory, exposed as a
//! library so the server binary, the CLI, and the integration tests share it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
