use std::path::PathBuf;

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::admin::{import_dir, review_entry};
use crate::errors::AppError;
use crate::models::entry::ApprovalStatus;
use crate::state::AppState;

/// Shared-secret header check for the admin endpoints.
fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), AppError> {
    let token = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if token != state.config.admin_token {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub ok: bool,
    pub count: usize,
}

/// POST /api/reload
/// Re-imports entry documents from the data directory.
pub async fn handle_reload(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReloadResponse>, AppError> {
    require_admin(&headers, &state)?;

    let dir = PathBuf::from(&state.config.data_dir);
    let count = import_dir(&state.db, &dir, Utc::now().date_naive()).await?;
    info!("Reloaded {count} entries from {}", dir.display());

    Ok(Json(ReloadResponse { ok: true, count }))
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub entry_id: String,
    pub action: ReviewAction,
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub ok: bool,
    pub entry_id: String,
    pub status: ApprovalStatus,
}

/// POST /api/review
/// Approves or rejects a submitted entry.
pub async fn handle_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    require_admin(&headers, &state)?;

    let status = match req.action {
        ReviewAction::Approve => ApprovalStatus::Approved,
        ReviewAction::Reject => ApprovalStatus::Rejected,
    };
    review_entry(&state.db, &req.entry_id, status, req.note.as_deref()).await?;
    info!("Entry {} reviewed: {status:?}", req.entry_id);

    Ok(Json(ReviewResponse {
        ok: true,
        entry_id: req.entry_id,
        status,
    }))
}
