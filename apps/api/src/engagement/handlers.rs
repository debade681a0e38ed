use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::engagement::ledger::{self, LikeAction};
use crate::errors::AppError;
use crate::identity::client_ip;
use crate::scoring;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EngagementRequest {
    pub entry_id: String,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub ok: bool,
    pub entry_id: String,
    pub votes: i64,
    pub score: i64,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub ok: bool,
    pub entry_id: String,
    pub action: LikeAction,
    pub likes: i64,
}

/// POST /api/vote
/// One vote per entry per requester identity per calendar day. The identity
/// is day-scoped, so the same client hashes to a fresh key each day.
pub async fn handle_vote(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<EngagementRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let entry = ledger::approved_entry(&state.db, &req.entry_id).await?;

    let today = Utc::now().date_naive();
    let ip = client_ip(&headers, peer);
    let identity = state.hasher.hash(&ip, Some(today));

    let votes = ledger::record_vote(&state.db, &entry.id, &identity, today).await?;
    let snapshot = scoring::compute(votes, entry.last_activity_date, today);

    Ok(Json(VoteResponse {
        ok: true,
        entry_id: entry.id,
        votes,
        score: snapshot.total_score,
    }))
}

/// POST /api/like
/// Permanent identity (no day scope); a repeat like from the same identity
/// toggles the like off instead of erroring.
pub async fn handle_like(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<EngagementRequest>,
) -> Result<Json<LikeResponse>, AppError> {
    let entry = ledger::approved_entry(&state.db, &req.entry_id).await?;

    let ip = client_ip(&headers, peer);
    let identity = state.hasher.hash(&ip, None);

    let (action, likes) = ledger::toggle_like(&state.db, &entry.id, &identity).await?;

    Ok(Json(LikeResponse {
        ok: true,
        entry_id: entry.id,
        action,
        likes,
    }))
}
