//! Service status at the root path.

use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use super::iso_timestamp;

pub const STATUS_MESSAGE: &str = "Force browser server is running!";

/// Routes described by the status endpoint, keyed by method and path.
pub const ENDPOINT_DESCRIPTIONS: [(&str, &str); 3] = [
    ("GET /", "Server status"),
    ("GET /api/force-browser", "Force browser redirect endpoint"),
    ("GET /health", "Health check"),
];

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Root handler reporting that the server is up and what it serves.
pub async fn index() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE,
        timestamp: iso_timestamp(),
        endpoints: ENDPOINT_DESCRIPTIONS.into_iter().collect(),
    })
}
