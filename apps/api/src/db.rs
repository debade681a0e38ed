use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Creates the SQLite connection pool, creating the database file if needed.
pub async fn create_pool(db_path: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {db_path}");

    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{db_path}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates the tables and the two unique indexes the engagement ledger
/// relies on. The vote index makes (entry_id, vote_date, ip_hash) unique —
/// one vote per entry per identity per day. The like index makes
/// (entry_id, ip_hash) unique — one active like per identity per entry.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id                 TEXT PRIMARY KEY,
            title              TEXT NOT NULL,
            owner              TEXT NOT NULL,
            repo_url           TEXT NOT NULL,
            last_activity_date DATE NOT NULL,
            summary            TEXT NOT NULL,
            tags               TEXT,
            status             TEXT NOT NULL DEFAULT 'pending',
            submitted_at       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            reviewed_at        DATETIME,
            review_note        TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id  TEXT NOT NULL,
            vote_date DATE NOT NULL,
            ip_hash   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_vote
         ON votes (entry_id, vote_date, ip_hash)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS likes (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id   TEXT NOT NULL,
            ip_hash    TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_like
         ON likes (entry_id, ip_hash)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
