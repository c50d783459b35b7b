//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines
//! constants for HTTP cache headers, CORS policy, the redirect page, logging,
//! and default paths. `AppConfig` is the root configuration struct containing
//! all settings; every field has a default so the service runs with no file.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Interface the server binds to when none is configured
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Port the server listens on when neither the config file nor `PORT` set one
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// How long in-flight requests may take to finish after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Content type of the redirect page
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Redirect pages and health checks must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Methods advertised on every response
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Request headers advertised on every response
pub const CORS_ALLOW_HEADERS: &str =
    "Origin, X-Requested-With, Content-Type, Accept, Authorization";

// =============================================================================
// Redirect Page
// =============================================================================

/// File name offered to the client for the downloaded page
pub const REDIRECT_FILE_NAME: &str = "open.html";

/// Makes the client save the page and open it with its default browser
pub const CONTENT_DISPOSITION_REDIRECT: &str =
    formatcp!("attachment; filename={}", REDIRECT_FILE_NAME);

/// Delay before the page retries navigation if it is still displayed
pub const REDIRECT_FALLBACK_DELAY_MS: u64 = 2000;

/// Name the redirect page template is registered under
pub const REDIRECT_TEMPLATE_NAME: &str = "force_browser.html";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "force_browser=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Accepted values for `logging.format`
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Redirect destination policy
    #[serde(default)]
    pub redirect: RedirectConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Seconds to wait for open connections during graceful shutdown
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// Which destinations the redirect endpoint accepts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectConfig {
    /// URL schemes accepted as redirect targets. Empty accepts any scheme
    /// that carries a host.
    #[serde(default)]
    pub allowed_schemes: Vec<String>,
}

impl RedirectConfig {
    /// Check whether a (lower-case) scheme may be redirected to.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.allowed_schemes.is_empty() || self.allowed_schemes.iter().any(|s| s == scheme)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, or use defaults when no path is given.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => AppConfig::default(),
        };
        config.validated()
    }

    /// Override the listening port, e.g. from the `PORT` environment variable.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.http.port = port;
        }
        self
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }

        for scheme in self.redirect.allowed_schemes.iter_mut() {
            *scheme = scheme.trim().trim_end_matches(':').to_ascii_lowercase();
            if scheme.is_empty() {
                return Err(ConfigError::Validation(
                    "redirect.allowed_schemes must not contain empty entries".to_string(),
                ));
            }
        }

        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None::<&str>).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.http.shutdown_grace_seconds, 30);
        assert!(config.redirect.allowed_schemes.is_empty());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[http]\nport = 8080\n");
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_port_override_wins() {
        let file = write_config("[http]\nport = 8080\n");
        let config = AppConfig::load(Some(file.path()))
            .unwrap()
            .with_port(Some(9000));
        assert_eq!(config.http.port, 9000);

        let config = AppConfig::default().with_port(None);
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_schemes_are_normalized() {
        let file = write_config("[redirect]\nallowed_schemes = [\"HTTPS\", \"http:\"]\n");
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.redirect.allowed_schemes, vec!["https", "http"]);
        assert!(config.redirect.allows_scheme("https"));
        assert!(!config.redirect.allows_scheme("ftp"));
    }

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let redirect = RedirectConfig::default();
        assert!(redirect.allows_scheme("ftp"));
        assert!(redirect.allows_scheme("intent"));
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let file = write_config("[logging]\nformat = \"xml\"\n");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_scheme_rejected() {
        let file = write_config("[redirect]\nallowed_schemes = [\" \"]\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load(Some("/nonexistent/force-browser.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_config("[http\nport = ");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));
    }
}
