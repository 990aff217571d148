//! Repository for ingredient database operations.
//!
//! Implements the three operations the service exposes: bounded listing,
//! transactional insert, and transactional partial update. Connections are
//! returned to the pool when their guards drop, on success and error paths
//! alike; an uncommitted transaction rolls back on drop.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::{
    error::{CoreError, Result},
    models::{Ingredient, IngredientId, NewIngredient, PatchField},
};

/// Fixed row cap for listings. There is no pagination parameter.
pub const LIST_LIMIT: i64 = 10;

/// Repository for ingredient database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    /// Fetches the first [`LIST_LIMIT`] ingredient rows. Row order is
    /// unspecified.
    ///
    /// The id column is selected along with the rest of the row; whether it
    /// is surfaced to clients is the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or no connection is available.
    pub async fn list(&self) -> Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r"
            SELECT id, name, price, unit
            FROM ingredients
            LIMIT $1
            ",
        )
        .bind(LIST_LIMIT)
        .fetch_all(&*self.pool)
        .await?;

        debug!(count = rows.len(), "fetched ingredients");
        Ok(rows)
    }

    /// Inserts a new ingredient and returns the storage-assigned id.
    ///
    /// Runs in a transaction: commit on success, rollback (via drop) on any
    /// failure before the commit.
    ///
    /// # Errors
    ///
    /// Returns error if the insert or commit fails.
    pub async fn create(&self, new: &NewIngredient) -> Result<IngredientId> {
        let mut tx = self.pool.begin().await?;

        let id: IngredientId = sqlx::query_scalar(
            r"
            INSERT INTO ingredients (name, price, unit)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.unit)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(%id, "created ingredient");
        Ok(id)
    }

    /// Applies a partial update and returns the full updated record.
    ///
    /// The SET clause is assembled from the closed [`PatchField`] set; column
    /// names come only from that allow-list and every value is bound. Zero
    /// rows updated means the id does not exist.
    ///
    /// # Errors
    ///
    /// - `CoreError::InvalidRequest` if `fields` is empty (callers are
    ///   expected to reject this before acquiring a connection).
    /// - `CoreError::NotFound` if no row has the given id; the transaction
    ///   rolls back without committing.
    /// - Any other failure from the update or commit.
    pub async fn update(&self, id: IngredientId, fields: &[PatchField]) -> Result<Ingredient> {
        if fields.is_empty() {
            return Err(CoreError::InvalidRequest("no fields to update".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let mut query = build_update(id, fields);
        let updated = query
            .build_query_as::<Ingredient>()
            .fetch_optional(&mut *tx)
            .await?;

        match updated {
            Some(ingredient) => {
                tx.commit().await?;
                debug!(%id, "updated ingredient");
                Ok(ingredient)
            },
            None => Err(CoreError::NotFound(format!("ingredient {id} not found"))),
        }
    }
}

/// Builds `UPDATE ingredients SET ... WHERE id = $n RETURNING ...` for the
/// supplied field set. Values and the id are always bound parameters.
fn build_update(id: IngredientId, fields: &[PatchField]) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE ingredients SET ");

    let mut set = query.separated(", ");
    for field in fields {
        set.push(field.column());
        set.push_unseparated(" = ");
        match field {
            PatchField::Name(name) => set.push_bind_unseparated(name.clone()),
            PatchField::Price(price) => set.push_bind_unseparated(*price),
            PatchField::Unit(unit) => set.push_bind_unseparated(unit.clone()),
        };
    }

    query.push(" WHERE id = ");
    query.push_bind(id.0);
    query.push(" RETURNING id, name, price, unit");
    query
}
