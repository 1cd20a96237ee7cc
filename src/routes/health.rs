use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;

use crate::config::Role;
use crate::db;
use crate::readiness::{HealthStatus, Snapshot};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: HealthStatus,
    role: Role,
    region: String,
    database: Snapshot,
    timestamp: i64,
}

/// GET /api/health - Readiness for the failover router
///
/// Probes the database whenever a pool exists, records the outcome, then
/// classifies the refreshed snapshot. 503 means "route traffic elsewhere".
///
/// A writable database only counts as connected once its tables exist, so an
/// instance that first reaches the database here bootstraps before going 200.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if let Some(database) = &state.db {
        match db::probe(database).await {
            Ok(read_only) => {
                state.readiness.record_read_only(read_only);
                let ready = if read_only {
                    true
                } else {
                    match state.ensure_schema().await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::error!("Schema bootstrap failed: {}", e);
                            false
                        }
                    }
                };
                state.readiness.record_probe_result(ready);
            }
            Err(e) => {
                tracing::error!("Health probe failed: {}", e);
                state.readiness.record_probe_result(false);
            }
        }
    }

    let verdict = state.readiness.verdict();
    let response = HealthResponse {
        status: verdict.status,
        role: state.readiness.role(),
        region: state.config.region.clone(),
        database: state.readiness.snapshot(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    (verdict.code, Json(response))
}
