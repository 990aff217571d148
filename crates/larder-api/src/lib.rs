//! Larder HTTP API.
//!
//! Configuration, routing, and request handlers for the ingredients
//! service. The binary crate wires this together with the storage layer
//! from `larder-core`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server, AppState};
