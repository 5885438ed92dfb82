use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use tracing::error;

/// Failure taxonomy for every song operation.
///
/// Validation failures are raised at the service boundary and never reach the
/// repository; storage and external-API errors are logged at their origin and
/// propagated here unchanged.
#[derive(thiserror::Error)]
pub enum SongError {
    #[error("{0}")]
    Validation(String),
    #[error("song with id {0} not found")]
    NotFound(i64),
    #[error("database error")]
    Storage(#[from] sqlx::Error),
    #[error("external metadata API error")]
    ExternalApi(#[from] reqwest::Error),
}

impl std::fmt::Debug for SongError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for SongError {
    fn into_response(self) -> Response {
        match self {
            SongError::Validation(e) => {
                (StatusCode::BAD_REQUEST, format!("Validation error: {}", e)).into_response()
            }
            SongError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Song with id {} not found", id),
            )
                .into_response(),
            SongError::Storage(e) => {
                error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
            SongError::ExternalApi(e) => {
                error!("External metadata API error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch song details".to_string(),
                )
                    .into_response()
            }
        }
    }
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn format_error_details(e: &anyhow::Error) -> String {
    // Get the full error chain
    let error_chain = e.chain().collect::<Vec<_>>();
    // Initialize result with the main error
    let mut result = format!("{}\n", e);
    // Only show the error types and unique messages
    result.push_str("Error chain:\n");

    // Track seen messages to avoid duplication
    let mut seen_messages = std::collections::HashSet::new();
    seen_messages.insert(e.to_string());

    for (i, err) in error_chain.iter().enumerate().skip(1) {
        // Extract type name (last part after ::)
        let type_name = std::any::type_name_of_val(err)
            .split("::")
            .last()
            .unwrap_or("Unknown");

        // Only add message if we haven't seen it before
        let err_msg = err.to_string();
        if seen_messages.insert(err_msg.clone()) {
            result.push_str(&format!("  [{}] {} - {}\n", i, type_name, err_msg));
        } else {
            // Just show the type if message is duplicate
            result.push_str(&format!("  [{}] {}\n", i, type_name));
        }
    }
    result
}
