use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Moderation state of a submitted entry. Only `Approved` entries are
/// visible on the leaderboard and accept votes/likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A submitted abandoned-project record, as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub repo_url: String,
    pub last_activity_date: NaiveDate,
    pub summary: String,
    /// Comma-separated tag list, or NULL.
    pub tags: Option<String>,
    pub status: ApprovalStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
}

/// One leaderboard row: entry fields plus the live score breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub repo_url: String,
    pub last_activity_date: NaiveDate,
    pub summary: String,
    pub tags: Option<String>,
    pub status: ApprovalStatus,
    pub days_stale: i64,
    pub votes: i64,
    pub likes: i64,
    pub score: i64,
}
