pub mod handlers;

use std::path::Path;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::errors::AppError;
use crate::models::entry::ApprovalStatus;

/// One entry document as submitted in `data/entries/*.yml`.
#[derive(Debug, Deserialize)]
pub struct EntryDoc {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub repo_url: String,
    #[serde(alias = "last_commit")]
    pub last_activity_date: Option<NaiveDate>,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EntryDoc {
    fn tags_joined(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(","))
        }
    }
}

/// Upserts all YAML entry documents under `dir` and returns how many were
/// imported. Content fields are replaced; moderation columns are never
/// touched, so re-importing cannot un-approve an entry. New entries start
/// `pending`. Unparseable files are logged and skipped.
pub async fn import_dir(db: &SqlitePool, dir: &Path, today: NaiveDate) -> Result<usize, AppError> {
    if !dir.is_dir() {
        return Err(AppError::Validation(format!(
            "Data directory not found: {}",
            dir.display()
        )));
    }

    let mut count = 0;
    let listing = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))
        .map_err(AppError::Internal)?;

    for dirent in listing {
        let path = match dirent {
            Ok(d) => d.path(),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {e}");
                continue;
            }
        };
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => {}
            _ => continue,
        }

        let doc = match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| serde_yaml::from_str::<EntryDoc>(&text).map_err(Into::into))
        {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        upsert_entry(db, &doc, today).await?;
        count += 1;
    }

    Ok(count)
}

async fn upsert_entry(db: &SqlitePool, doc: &EntryDoc, today: NaiveDate) -> Result<(), AppError> {
    // entries with no known activity date default to 30 days ago
    let last_activity_date = doc
        .last_activity_date
        .or_else(|| today.checked_sub_days(Days::new(30)))
        .unwrap_or(today);

    sqlx::query(
        r#"
        INSERT INTO entries
            (id, title, owner, repo_url, last_activity_date, summary, tags, status, submitted_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8)
        ON CONFLICT (id) DO UPDATE SET
            title = excluded.title,
            owner = excluded.owner,
            repo_url = excluded.repo_url,
            last_activity_date = excluded.last_activity_date,
            summary = excluded.summary,
            tags = excluded.tags
        "#,
    )
    .bind(&doc.id)
    .bind(&doc.title)
    .bind(&doc.owner)
    .bind(&doc.repo_url)
    .bind(last_activity_date)
    .bind(&doc.summary)
    .bind(doc.tags_joined())
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

/// Applies a moderation decision to an entry.
pub async fn review_entry(
    db: &SqlitePool,
    entry_id: &str,
    status: ApprovalStatus,
    note: Option<&str>,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE entries SET status = ?1, reviewed_at = ?2, review_note = ?3 WHERE id = ?4",
    )
    .bind(status)
    .bind(Utc::now())
    .bind(note)
    .bind(entry_id)
    .execute(db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
