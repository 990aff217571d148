//! Health check handler for service monitoring.
//!
//! Probes pool availability by checking a connection out and releasing it.
//! Always answers 200; the body fields carry the actual health state, so
//! monitors never see this endpoint itself fail.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::server::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status.
    pub status: HealthStatus,
    /// Database connectivity as seen by the pool.
    pub database: DatabaseStatus,
}

/// Overall health status.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A connection could be acquired and released.
    Healthy,
    /// The pool could not produce a connection.
    Unhealthy,
}

/// Database connectivity status.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    /// Pool produced a usable connection.
    Connected,
    /// Connection acquisition failed.
    Disconnected,
}

/// Health check endpoint handler.
///
/// Never propagates a failure: any acquisition error becomes a structured
/// unhealthy response.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let response = match state.storage.health_check().await {
        Ok(()) => {
            debug!("database health check passed");
            HealthResponse { status: HealthStatus::Healthy, database: DatabaseStatus::Connected }
        },
        Err(e) => {
            error!(error = %e, "database health check failed");
            HealthResponse {
                status: HealthStatus::Unhealthy,
                database: DatabaseStatus::Disconnected,
            }
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
