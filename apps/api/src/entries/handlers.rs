use axum::{extract::State, Json};
use chrono::Utc;

use crate::entries::list_scored;
use crate::errors::AppError;
use crate::models::entry::ScoredEntry;
use crate::state::AppState;

/// GET /api/entries
/// The leaderboard: all approved entries with live scores, highest first.
pub async fn handle_list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScoredEntry>>, AppError> {
    let entries = list_scored(&state.db, Utc::now().date_naive()).await?;
    Ok(Json(entries))
}
