//! The engagement ledger: the two append/delete-only relations (votes,
//! likes) behind the leaderboard, and the uniqueness rules that make them
//! abuse-resistant. Every mutation here is a single conflict-aware
//! statement or one transaction, so concurrent duplicate requests racing on
//! the same (entry, identity, day) key cannot both commit.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::entry::EntryRow;

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

/// Looks up an entry that is visible to voters/likers. Unapproved entries
/// report the same `NotFound` as missing ones, so moderation state is not
/// probeable through the engagement endpoints.
pub async fn approved_entry(db: &SqlitePool, entry_id: &str) -> Result<EntryRow, AppError> {
    let entry: Option<EntryRow> =
        sqlx::query_as("SELECT * FROM entries WHERE id = ?1 AND status = 'approved'")
            .bind(entry_id)
            .fetch_optional(db)
            .await?;

    entry.ok_or(AppError::NotFound)
}

/// Records one vote for `(entry_id, today, identity_hash)` and returns the
/// entry's updated lifetime vote count.
///
/// The uniqueness check and the insert are a single statement: the insert
/// lands on the `(entry_id, vote_date, ip_hash)` unique index and conflicts
/// resolve to no-op, so of N concurrent duplicates exactly one reports
/// success and the rest get `AlreadyVoted`.
pub async fn record_vote(
    db: &SqlitePool,
    entry_id: &str,
    identity_hash: &str,
    today: NaiveDate,
) -> Result<i64, AppError> {
    let inserted = sqlx::query(
        "INSERT INTO votes (entry_id, vote_date, ip_hash) VALUES (?1, ?2, ?3)
         ON CONFLICT (entry_id, vote_date, ip_hash) DO NOTHING",
    )
    .bind(entry_id)
    .bind(today)
    .bind(identity_hash)
    .execute(db)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AppError::AlreadyVoted);
    }

    vote_count(db, entry_id).await
}

/// Toggles a like for `(entry_id, identity_hash)`: deletes the record if it
/// exists, inserts it otherwise. Runs in one transaction so the check and
/// the mutation cannot interleave with a concurrent toggle on the same key.
/// Returns the action taken and the entry's updated like count.
pub async fn toggle_like(
    db: &SqlitePool,
    entry_id: &str,
    identity_hash: &str,
) -> Result<(LikeAction, i64), AppError> {
    let mut tx = db.begin().await?;

    let deleted = sqlx::query("DELETE FROM likes WHERE entry_id = ?1 AND ip_hash = ?2")
        .bind(entry_id)
        .bind(identity_hash)
        .execute(&mut *tx)
        .await?;

    let action = if deleted.rows_affected() > 0 {
        LikeAction::Unliked
    } else {
        sqlx::query(
            "INSERT INTO likes (entry_id, ip_hash) VALUES (?1, ?2)
             ON CONFLICT (entry_id, ip_hash) DO NOTHING",
        )
        .bind(entry_id)
        .bind(identity_hash)
        .execute(&mut *tx)
        .await?;
        LikeAction::Liked
    };

    let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE entry_id = ?1")
        .bind(entry_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok((action, likes))
}

/// Lifetime vote count for an entry. Older days accumulate — only same-day
/// duplicates are rejected — so this is the Score Engine's `votes` input.
pub async fn vote_count(db: &SqlitePool, entry_id: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE entry_id = ?1")
        .bind(entry_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}
