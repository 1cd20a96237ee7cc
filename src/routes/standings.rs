use axum::{extract::State, response::Json};

use crate::db;
use crate::error::ApiError;
use crate::models::Standing;
use crate::state::AppState;

// GET /api/standings - Points table, points then goal difference descending
pub async fn get_standings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Standing>>, ApiError> {
    let pool = state.pool()?;
    let standings = db::get_standings(pool).await?;

    Ok(Json(standings))
}
