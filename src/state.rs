//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Instant;

use tera::Tera;

use crate::config::AppConfig;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything in here is read-only after startup: the configuration, the
/// compiled redirect page template, and the instant the process started
/// serving (reported as `uptime` by the health check).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new application state from the given configuration and templates.
    pub fn new(config: AppConfig, tera: Tera) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            started_at: Instant::now(),
        }
    }

    /// Seconds elapsed since the state was created.
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
