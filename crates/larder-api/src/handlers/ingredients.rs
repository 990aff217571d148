//! Ingredient CRUD handlers: bounded listing, create, and partial update.
//!
//! Body shape validation (required fields, types, JSON syntax) is the
//! `Json` extractor's job and rejects before these handlers run. The
//! handlers own semantic validation, storage delegation, and error
//! translation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use larder_core::{CoreError, Ingredient, IngredientId, IngredientPatch, NewIngredient};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{handlers::error_response, server::AppState};

/// Listing response container.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// The first rows of the table, at most ten.
    pub ingredients: Vec<ListedIngredient>,
}

/// One ingredient as it appears in a listing.
///
/// Listings do not carry the row id; only create and update responses do.
#[derive(Debug, Serialize)]
pub struct ListedIngredient {
    /// Display name.
    pub name: String,
    /// Price per unit.
    pub price: f64,
    /// Unit of measure.
    pub unit: String,
}

impl From<Ingredient> for ListedIngredient {
    fn from(ingredient: Ingredient) -> Self {
        // The id is read from storage but not surfaced here.
        Self { name: ingredient.name, price: ingredient.price, unit: ingredient.unit }
    }
}

/// Lists the first ten ingredients.
///
/// # Errors
///
/// 503 when no connection is available, 500 on any other failure.
#[instrument(name = "list_ingredients", skip(state))]
pub async fn list_ingredients(State(state): State<AppState>) -> Response {
    match state.storage.ingredients.list().await {
        Ok(rows) => {
            let ingredients = rows.into_iter().map(ListedIngredient::from).collect();
            (StatusCode::OK, Json(ListResponse { ingredients })).into_response()
        },
        Err(e) => {
            error!(error = %e, "failed to list ingredients");
            error_response(&e)
        },
    }
}

/// Creates an ingredient and returns it with the storage-assigned id.
///
/// # Errors
///
/// 503 when no connection is available, 500 on any other failure.
#[instrument(name = "create_ingredient", skip(state, new))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(new): Json<NewIngredient>,
) -> Response {
    match state.storage.ingredients.create(&new).await {
        Ok(id) => {
            info!(%id, name = %new.name, "created ingredient");
            let ingredient =
                Ingredient { id, name: new.name, price: new.price, unit: new.unit };
            (StatusCode::OK, Json(ingredient)).into_response()
        },
        Err(e) => {
            error!(error = %e, "failed to create ingredient");
            error_response(&e)
        },
    }
}

/// Applies a partial update to one ingredient and returns the full record.
///
/// An empty patch is rejected with 400 before any connection is acquired.
///
/// # Errors
///
/// 400 on an empty patch, 404 when the id does not exist, 503 when no
/// connection is available, 500 on any other failure.
#[instrument(name = "update_ingredient", skip(state, patch))]
pub async fn update_ingredient(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(patch): Json<IngredientPatch>,
) -> Response {
    let fields = patch.fields();
    if fields.is_empty() {
        warn!("update request with no fields");
        return error_response(&CoreError::InvalidRequest("no fields to update".to_string()));
    }

    match state.storage.ingredients.update(IngredientId(id), &fields).await {
        Ok(ingredient) => {
            info!(%id, "updated ingredient");
            (StatusCode::OK, Json(ingredient)).into_response()
        },
        Err(e) => {
            warn!(error = %e, "failed to update ingredient");
            error_response(&e)
        },
    }
}
