//! Handler for the force-browser redirect endpoint.
//!
//! Hands the caller a small HTML document as a download. Opening the file
//! hands it to the system's default browser, which then follows the scripted
//! redirect to the requested destination.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::instrument;

use crate::config::{CONTENT_DISPOSITION_REDIRECT, CONTENT_TYPE_HTML};
use crate::error::ApiError;
use crate::redirect::RedirectTarget;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForceBrowserParams {
    #[serde(rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

/// Validates `redirectUrl` and serves the auto-redirect page.
#[instrument(name = "force_browser::open", skip_all)]
pub async fn open(
    State(state): State<AppState>,
    params: Result<Query<ForceBrowserParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::MalformedQuery(e.body_text()))?;

    let target = RedirectTarget::parse(params.redirect_url.as_deref(), &state.config.redirect)?;
    let html = target.render_page(&state.tera)?;

    tracing::debug!(
        scheme = target.scheme(),
        redirect_url = %target.as_str(),
        "Serving redirect page"
    );

    Ok((
        [
            (CONTENT_TYPE, CONTENT_TYPE_HTML),
            (CONTENT_DISPOSITION, CONTENT_DISPOSITION_REDIRECT),
        ],
        html,
    )
        .into_response())
}
