use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use crate::db;
use crate::error::ApiError;
use crate::models::{Match, MatchCreatedResponse, NewMatchRequest};
use crate::state::AppState;

// GET /api/group-matches - All fixtures by date
pub async fn get_group_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let pool = state.pool()?;
    let matches = db::get_all_matches(pool).await?;

    Ok(Json(matches))
}

/// POST /api/match - Insert a fixture
///
/// Refused with 423 on a secondary or while the database is read-only,
/// before the body is looked at.
pub async fn create_match(
    State(state): State<AppState>,
    payload: Result<Json<NewMatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchCreatedResponse>), ApiError> {
    let pool = state.writable_pool()?;

    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let new_match = request.validate()?;

    let match_id = db::insert_match(pool, &new_match).await?;
    tracing::info!(match_id, team1 = %new_match.team1, team2 = %new_match.team2, "Match created");

    Ok((
        StatusCode::CREATED,
        Json(MatchCreatedResponse {
            message: "Match created".to_string(),
            match_id,
        }),
    ))
}
