use axum::{extract::State, response::Json};

use crate::db;
use crate::error::ApiError;
use crate::models::PlayerStat;
use crate::state::AppState;

// GET /api/player-stats - Player stats, runs then wickets descending
pub async fn get_player_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerStat>>, ApiError> {
    let pool = state.pool()?;
    let players = db::get_player_stats(pool).await?;

    Ok(Json(players))
}
