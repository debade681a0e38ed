pub mod handlers;

use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use crate::errors::AppError;
use crate::models::entry::{EntryRow, ScoredEntry};
use crate::scoring;

#[derive(FromRow)]
struct EntryWithCounts {
    #[sqlx(flatten)]
    entry: EntryRow,
    votes: i64,
    likes: i64,
}

/// Loads every approved entry with its live vote/like counts and score,
/// sorted by score descending. Scores are derived here on every call and
/// never stored, so the leaderboard always reflects the current ledger
/// state and the current date.
pub async fn list_scored(db: &SqlitePool, today: NaiveDate) -> Result<Vec<ScoredEntry>, AppError> {
    let rows: Vec<EntryWithCounts> = sqlx::query_as(
        r#"
        SELECT e.*,
               (SELECT COUNT(*) FROM votes v WHERE v.entry_id = e.id) AS votes,
               (SELECT COUNT(*) FROM likes l WHERE l.entry_id = e.id) AS likes
        FROM entries e
        WHERE e.status = 'approved'
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut scored: Vec<ScoredEntry> = rows
        .into_iter()
        .map(|row| {
            let snapshot = scoring::compute(row.votes, row.entry.last_activity_date, today);
            ScoredEntry {
                id: row.entry.id,
                title: row.entry.title,
                owner: row.entry.owner,
                repo_url: row.entry.repo_url,
                last_activity_date: row.entry.last_activity_date,
                summary: row.entry.summary,
                tags: row.entry.tags,
                status: row.entry.status,
                days_stale: snapshot.days_stale,
                votes: snapshot.votes,
                likes: row.likes,
                score: snapshot.total_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::ledger;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(&pool).await.unwrap();
        pool
    }

    async fn seed_entry(pool: &SqlitePool, id: &str, status: &str, last_activity: NaiveDate) {
        sqlx::query(
            "INSERT INTO entries
             (id, title, owner, repo_url, last_activity_date, summary, status, submitted_at)
             VALUES (?1, 'Title', 'owner', 'https://example.com/repo', ?2, 'summary', ?3, ?4)",
        )
        .bind(id)
        .bind(last_activity)
        .bind(status)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await
        .unwrap();
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_only_approved_entries_listed() {
        let pool = test_pool().await;
        let today = day(2024, 6, 1);
        seed_entry(&pool, "approved-proj", "approved", day(2024, 1, 1)).await;
        seed_entry(&pool, "pending-proj", "pending", day(2024, 1, 1)).await;
        seed_entry(&pool, "rejected-proj", "rejected", day(2024, 1, 1)).await;

        let listed = list_scored(&pool, today).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "approved-proj");
    }

    #[tokio::test]
    async fn test_sorted_by_score_descending() {
        let pool = test_pool().await;
        let today = day(2024, 6, 1);
        // fresh entry, no votes: score 0
        seed_entry(&pool, "fresh", "approved", today).await;
        // long-stale entry: high stale score
        seed_entry(&pool, "stale", "approved", day(2022, 1, 1)).await;

        ledger::record_vote(&pool, "fresh", "hash-a", today).await.unwrap();

        let listed = list_scored(&pool, today).await.unwrap();
        assert_eq!(listed[0].id, "stale");
        assert!(listed[0].score > listed[1].score);
    }

    #[tokio::test]
    async fn test_read_is_idempotent() {
        let pool = test_pool().await;
        let today = day(2024, 6, 1);
        seed_entry(&pool, "proj", "approved", day(2023, 6, 1)).await;
        ledger::record_vote(&pool, "proj", "hash-a", today).await.unwrap();
        ledger::toggle_like(&pool, "proj", "hash-a").await.unwrap();

        let first = list_scored(&pool, today).await.unwrap();
        let second = list_scored(&pool, today).await.unwrap();
        assert_eq!(first[0].score, second[0].score);
        assert_eq!(first[0].votes, second[0].votes);
        assert_eq!(first[0].likes, second[0].likes);
    }

    #[tokio::test]
    async fn test_counts_reflect_ledger() {
        let pool = test_pool().await;
        let today = day(2024, 6, 1);
        seed_entry(&pool, "proj", "approved", day(2023, 6, 1)).await;

        ledger::record_vote(&pool, "proj", "hash-a", today).await.unwrap();
        ledger::record_vote(&pool, "proj", "hash-b", today).await.unwrap();
        ledger::toggle_like(&pool, "proj", "hash-a").await.unwrap();

        let listed = list_scored(&pool, today).await.unwrap();
        assert_eq!(listed[0].votes, 2);
        assert_eq!(listed[0].likes, 1);
    }
}
