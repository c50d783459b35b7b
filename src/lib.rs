//! force-browser: hands out pages that reopen a link in the system browser.
//!
//! `GET /api/force-browser?redirectUrl=<url>` returns a small HTML document
//! as a download. Opening it launches the default browser, which follows a
//! scripted redirect to `<url>`. Useful for escaping in-app web views.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod redirect;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
