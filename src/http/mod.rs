//! HTTP server module.
//!
//! Serves plain HTTP with:
//! - Permissive CORS on every response
//! - Graceful shutdown on SIGTERM/SIGINT

pub mod cors;
mod server;
mod shutdown;

pub use server::{start_server, ServerError};
