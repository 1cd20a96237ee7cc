pub mod debug;
pub mod health;
pub mod matches;
pub mod players;
pub mod standings;

use crate::error::ApiError;

// Unknown /api/* paths get a JSON 404 instead of the frontend fallback
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}
