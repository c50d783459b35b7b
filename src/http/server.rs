//! HTTP server startup logic.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;
use crate::error::AVAILABLE_ENDPOINTS;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Invalid http.host or http.port: {0}")]
    Address(#[from] std::net::AddrParseError),
}

/// Parse the configured listen address.
pub fn listen_addr(config: &AppConfig) -> Result<SocketAddr, ServerError> {
    Ok(format!("{}:{}", config.http.host, config.http.port).parse()?)
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let handle = Handle::new();

    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.http.shutdown_grace_seconds),
    );

    tracing::info!(%addr, "Starting HTTP server");
    log_endpoints(config.http.port);

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn log_endpoints(port: u16) {
    let base = format!("http://localhost:{}", port);
    for endpoint in AVAILABLE_ENDPOINTS {
        if let Some((method, path)) = endpoint.split_once(' ') {
            tracing::info!("Available endpoint: {} {}{}", method, base, path);
        }
    }
    tracing::info!(
        "Example usage: {}/api/force-browser?redirectUrl=https://instagram.com",
        base
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_from_config() {
        let config = AppConfig::default().with_port(Some(8081));
        assert_eq!(listen_addr(&config).unwrap().to_string(), "0.0.0.0:8081");
    }

    #[test]
    fn test_listen_addr_rejects_bad_host() {
        let mut config = AppConfig::default();
        config.http.host = "not a host".to_string();
        assert!(matches!(listen_addr(&config), Err(ServerError::Address(_))));
    }
}
