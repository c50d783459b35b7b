//! HTTP route handlers.
//!
//! Three routes are served: the status root, the health check, and the
//! force-browser redirect. Anything else falls through to a JSON 404, and a
//! panicking handler is turned into a JSON 500.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod fallback;
pub mod force_browser;
pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use chrono::{SecondsFormat, Utc};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::http::cors;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Creates the Axum router with all routes, CORS and cache headers.
pub fn create_router(state: AppState) -> Router {
    with_layers(routes(), state)
}

/// Route table, before state and the shared layers are applied.
fn routes() -> Router<AppState> {
    // Redirect page - never cached, each download must reflect the request
    let redirect_routes = Router::new()
        .route(
            "/api/force-browser",
            get(force_browser::open).fallback(fallback::not_found),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Health check - no caching, always fresh for liveness checks
    let health_routes = Router::new()
        .route(
            "/health",
            get(health::health).fallback(fallback::not_found),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let home_routes =
        Router::new().route("/", get(home::index).fallback(fallback::not_found));

    Router::new()
        .merge(home_routes)
        .merge(redirect_routes)
        .merge(health_routes)
        .fallback(fallback::not_found)
}

/// Applies state, panic catching, CORS and request tracing to a route table.
fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    let router = routes
        .with_state(state)
        // Panics inside handlers become the generic 500 body
        .layer(CatchPanicLayer::custom(fallback::panic_response));

    cors::with_cors(router)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
