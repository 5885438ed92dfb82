use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hyper::{StatusCode, header};
use secrecy::ExposeSecret;
use tracing::warn;

use crate::state::AppState;

/// Static-token check: the `Authorization` header must equal the configured
/// API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == state.api_key.expose_secret() => next.run(request).await,
        _ => {
            warn!("rejecting request with a missing or invalid API key");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}
