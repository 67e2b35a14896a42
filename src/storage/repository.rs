use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::JournalEntry;

use super::MIGRATION_001_JOURNAL;

/// Repository for the persisted transfer journal.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_JOURNAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Append an entry to the journal.
    pub async fn save_entry(&self, entry: &JournalEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, account, amount_cents, digest, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.account)
        .bind(entry.amount_cents)
        .bind(&entry.digest)
        .bind(entry.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save journal entry")?;
        Ok(())
    }

    /// All journal entries, oldest first.
    pub async fn list_entries(&self) -> Result<Vec<JournalEntry>> {
        let rows = sqlx::query(
            "SELECT id, account, amount_cents, digest, recorded_at FROM transactions ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list journal entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Journal entries recorded for one account, oldest first.
    pub async fn list_entries_for_account(&self, account: &str) -> Result<Vec<JournalEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account, amount_cents, digest, recorded_at
            FROM transactions
            WHERE account = ?
            ORDER BY rowid
            "#,
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list journal entries for account")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<JournalEntry> {
        let id_str: String = row.get("id");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(JournalEntry {
            id: Uuid::parse_str(&id_str).context("Invalid journal entry ID")?,
            account: row.get("account"),
            amount_cents: row.get("amount_cents"),
            digest: row.get("digest"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
