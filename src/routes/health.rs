//! Health check endpoint for container orchestration.
//!
//! Provides a liveness check that returns 200 OK whenever the process can
//! answer HTTP, along with the current time and process uptime.

use axum::{extract::State, Json};
use serde::Serialize;

use super::iso_timestamp;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime: f64,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: iso_timestamp(),
        uptime: state.uptime_seconds(),
    })
}
