use axum::{Json, extract::State, response::IntoResponse};
use hyper::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::database::{Database, PoolStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    database: PoolStatus,
}

/// Reports the pool status so a degraded database is observable from the
/// outside.
#[instrument(name = "Health Check", skip_all)]
pub async fn health_check(State(db): State<Database>) -> impl IntoResponse {
    let database = db.status();
    let status_code = match database {
        PoolStatus::Healthy => StatusCode::OK,
        PoolStatus::Reconnecting | PoolStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(HealthResponse { database }))
}
