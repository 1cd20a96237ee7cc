use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Group-stage fixture, with a result once played
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Match {
    #[serde(rename = "MatchID")]
    pub id: i64,
    pub match_date: String,
    pub team1: String,
    pub team2: String,
    pub venue: Option<String>,
    pub result: Option<String>,
    pub stage: Option<String>,
}

/// Points-table row. `team_name` is unique.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Standing {
    #[serde(rename = "TeamID")]
    pub id: i64,
    pub team_name: String,
    pub matches_played: i64,
    pub wins: i64,
    pub losses: i64,
    pub points: i64,
    pub goal_difference: i64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerStat {
    #[serde(rename = "PlayerID")]
    pub id: i64,
    pub player_name: String,
    pub team: String,
    pub matches: i64,
    pub runs: i64,
    pub wickets: i64,
    pub catches: i64,
}

/// Request body for POST /api/match
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewMatchRequest {
    #[serde(default)]
    pub match_date: Option<String>,
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

/// Validated insert payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub match_date: String,
    pub team1: String,
    pub team2: String,
    pub venue: Option<String>,
    pub stage: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewMatchRequest {
    pub fn validate(self) -> Result<NewMatch, ApiError> {
        let (Some(match_date), Some(team1), Some(team2)) = (
            required(self.match_date),
            required(self.team1),
            required(self.team2),
        ) else {
            return Err(ApiError::Validation(
                "MatchDate, Team1 and Team2 are required".to_string(),
            ));
        };

        let date = chrono::NaiveDate::parse_from_str(&match_date, "%Y-%m-%d").map_err(|_| {
            ApiError::Validation(format!("MatchDate must be YYYY-MM-DD, got {match_date}"))
        })?;

        // Stored as zero-padded text so lexical order is date order
        Ok(NewMatch {
            match_date: date.format("%Y-%m-%d").to_string(),
            team1,
            team2,
            venue: required(self.venue),
            stage: required(self.stage),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchCreatedResponse {
    pub message: String,
    #[serde(rename = "MatchID")]
    pub match_id: i64,
}
