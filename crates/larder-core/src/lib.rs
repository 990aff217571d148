//! Core domain types and storage layer for the larder ingredients service.
//!
//! Provides the ingredient models, the error taxonomy shared by every
//! operation, and the repository-based database access layer. The HTTP
//! crate depends on these types; nothing here knows about axum or wire
//! routing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use models::{Ingredient, IngredientId, IngredientPatch, NewIngredient, PatchField};
pub use storage::Storage;
