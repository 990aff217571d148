//! Database access layer for ingredient persistence.
//!
//! Follows the repository pattern: one repository per table, all sharing a
//! single bounded connection pool. Direct SQL outside this module is
//! forbidden; handlers go through [`Storage`].

use std::sync::Arc;

use sqlx::PgPool;

pub mod ingredients;

use crate::error::Result;

/// Container for repository instances providing unified database access.
///
/// Owns the shared connection pool. Constructed once at startup and injected
/// into handlers; there is no global pool state.
#[derive(Clone)]
pub struct Storage {
    /// Repository for ingredient rows.
    pub ingredients: Arc<ingredients::Repository>,
}

impl Storage {
    /// Creates a new storage instance over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);

        Self {
            ingredients: Arc::new(ingredients::Repository::new(pool)),
        }
    }

    /// Probes pool availability for the health endpoint.
    ///
    /// Acquires a connection and releases it immediately on drop. No query
    /// is executed; a successful checkout is the health signal.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConnectionUnavailable` when the pool cannot
    /// produce a connection within the acquire timeout.
    pub async fn health_check(&self) -> Result<()> {
        let conn = self.ingredients.pool().acquire().await?;
        drop(conn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn storage_can_be_created() {
        // Construction must not touch the database; connectivity is
        // exercised in integration tests.
        let pool = sqlx::PgPool::connect_lazy("postgresql://localhost/larder").unwrap();
        let _storage = Storage::new(pool);
    }
}
