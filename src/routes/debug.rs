use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

// GET /api/debug - Process and configuration introspection, never credentials
pub async fn debug_info(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let database = &config.database;

    let pool = state.db.as_ref().map(|db| {
        json!({
            "size": db.pool.size(),
            "idle": db.pool.num_idle(),
            "closed": db.pool.is_closed(),
        })
    });

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "pid": std::process::id(),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "role": config.role,
        "region": config.region,
        "listen": format!("{}:{}", config.host, config.port),
        "database": {
            "driver": database.driver,
            "host": database.host,
            "port": database.port,
            "name": database.name,
            "sslMode": database.ssl_mode,
            "poolMax": database.pool_max,
            "pool": pool,
        },
        "readiness": state.readiness.snapshot(),
    }))
}
