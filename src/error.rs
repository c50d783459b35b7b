//! Request error types and their JSON rendering.
//!
//! Every error a handler can return is terminal to the request and maps to a
//! `{error, message}` JSON body at the response boundary. Internal failures
//! are logged server-side and reported with a generic message only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Routes listed in 404 responses.
pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /",
    "GET /api/force-browser?redirectUrl=<url>",
    "GET /health",
];

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong on the server";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing redirectUrl parameter")]
    MissingParameter,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL has no host")]
    MissingHost,

    #[error("Redirect scheme not allowed: {0}")]
    SchemeNotAllowed(String),

    #[error("Invalid query string: {0}")]
    MalformedQuery(String),

    #[error("Route {method} {path} not found")]
    NotFound { method: String, path: String },

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),
}

/// JSON body shared by all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(rename = "availableEndpoints", skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<&'static [&'static str]>,
}

impl ErrorBody {
    fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            available_endpoints: None,
        }
    }

    /// Body returned for any uncaught failure.
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter
            | ApiError::InvalidUrl(_)
            | ApiError::MissingHost
            | ApiError::SchemeNotAllowed(_)
            | ApiError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::MissingParameter => ErrorBody::new(
                "Missing redirectUrl parameter",
                "Please provide a redirectUrl query parameter",
            ),
            ApiError::InvalidUrl(_) | ApiError::MissingHost => {
                ErrorBody::new("Invalid URL format", "Please provide a valid URL")
            }
            ApiError::SchemeNotAllowed(scheme) => ErrorBody::new(
                "Redirect scheme not allowed",
                format!("URL scheme '{}' is not allowed", scheme),
            ),
            ApiError::MalformedQuery(reason) => {
                ErrorBody::new("Invalid query string", reason.clone())
            }
            ApiError::NotFound { .. } => ErrorBody {
                error: "Endpoint not found",
                message: self.to_string(),
                available_endpoints: Some(AVAILABLE_ENDPOINTS),
            },
            ApiError::Template(_) => ErrorBody::internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Internal error: {:?}", self);
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(err: &ApiError) -> serde_json::Value {
        serde_json::to_value(err.body()).unwrap()
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(ApiError::MissingParameter.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingHost.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::SchemeNotAllowed("ftp".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let parse_err = url::Url::parse("not a url").unwrap_err();
        assert_eq!(ApiError::from(parse_err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_lists_endpoints() {
        let err = ApiError::NotFound {
            method: "POST".into(),
            path: "/foo".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let json = body_json(&err);
        assert_eq!(json["error"], "Endpoint not found");
        assert_eq!(json["message"], "Route POST /foo not found");
        assert_eq!(json["availableEndpoints"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = ApiError::from(tera::Error::msg("database password is hunter2"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(&err);
        assert_eq!(json["error"], INTERNAL_ERROR);
        assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
        assert!(json.get("availableEndpoints").is_none());
        assert!(!json.to_string().contains("hunter2"));
    }

    #[test]
    fn test_host_and_parse_failures_share_body() {
        let parse_err = url::Url::parse("::").unwrap_err();
        assert_eq!(
            body_json(&ApiError::from(parse_err)),
            body_json(&ApiError::MissingHost)
        );
    }
}
