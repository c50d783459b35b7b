//! Permissive CORS policy.
//!
//! The allow headers are stamped onto every response, including errors and
//! 404s. Only genuine preflights (`OPTIONS` carrying both `Origin` and
//! `Access-Control-Request-Method`) are answered here; any other `OPTIONS`
//! request is routed like a normal one and ends in the JSON 404.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use http::Method;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS};

/// Whether a request is a CORS preflight rather than a plain `OPTIONS` call.
pub fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(ORIGIN)
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Answers preflights with an empty 204; the allow headers are added by the
/// layers in [`with_cors`].
pub async fn preflight_layer(request: Request, next: Next) -> Response {
    if is_preflight(&request) {
        tracing::debug!(path = %request.uri().path(), "Answering CORS preflight");
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

/// Wrap a router with preflight handling and the per-response allow headers.
pub fn with_cors(router: Router) -> Router {
    router
        .layer(middleware::from_fn(preflight_layer))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
}
