use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{ApiEnvelope, HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiEnvelope<HealthResponse>>) {
    let postgres = check_postgres(&state.postgres_pool).await;

    let ready = postgres.status == "ok";
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut envelope = ApiEnvelope::ok(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        ready,
        postgres,
    });
    envelope.success = ready;

    (http_status, Json(envelope))
}

async fn check_postgres(pool: &sqlx::PgPool) -> HealthDependencyStatus {
    let check = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    match check {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
