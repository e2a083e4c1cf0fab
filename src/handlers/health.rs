use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub service: &'static str,
}

impl HealthResponse {
    fn from_probe(database_up: bool) -> (StatusCode, Self) {
        if database_up {
            (
                StatusCode::OK,
                Self {
                    status: "ok",
                    database: "healthy",
                    service: "mindfeed",
                },
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "error",
                    database: "unhealthy",
                    service: "mindfeed",
                },
            )
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await;

    if let Err(e) = &probe {
        tracing::warn!(error = %e, "Database health probe failed");
    }

    let (status, body) = HealthResponse::from_probe(probe.is_ok());
    (status, Json(body))
}
