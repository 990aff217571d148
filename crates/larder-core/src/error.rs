//! Error types and result handling for ingredient operations.
//!
//! Defines the failure taxonomy the HTTP boundary maps onto status codes:
//! connection availability, request validity, missing rows, and everything
//! else the database can report.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for storage and domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The pool could not produce a connection (exhausted, closed, or the
    /// database is unreachable). Maps to 503 at the boundary.
    #[error("database unavailable: {0}")]
    ConnectionUnavailable(String),

    /// The request is semantically invalid and was rejected before any
    /// database work. Maps to 400 at the boundary.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The target row does not exist. Maps to 404 at the boundary.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other SQL or commit failure, message carried through. Maps to
    /// 500 at the boundary.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::ConnectionUnavailable(err.to_string())
            },
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                Self::ConnectionUnavailable(err.to_string())
            },
            sqlx::Error::RowNotFound => Self::NotFound("requested row not found".to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_classifies_as_unavailable() {
        let err = CoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, CoreError::ConnectionUnavailable(_)));

        let err = CoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, CoreError::ConnectionUnavailable(_)));
    }

    #[test]
    fn io_failure_classifies_as_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CoreError::from(sqlx::Error::Io(io));
        assert!(matches!(err, CoreError::ConnectionUnavailable(_)));
    }

    #[test]
    fn missing_row_classifies_as_not_found() {
        let err = CoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn other_sqlx_errors_classify_as_database() {
        let err = CoreError::from(sqlx::Error::Protocol("unexpected message".into()));
        assert!(matches!(err, CoreError::Database(_)));
    }

    #[test]
    fn messages_carry_the_underlying_cause() {
        let err = CoreError::Database("duplicate key value".to_string());
        assert!(err.to_string().contains("duplicate key value"));
    }
}
