mod dreams;
mod migrations;
mod persons;
mod tags;


use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::traits::{Person, Tag};

/// SQLite-backed entry store for persons, tags, and dreams.
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub async fn new(db_path: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        migrations::migrate_state(&pool).await?;
        tracing::info!("State store ready at {}", db_path);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_person(row: &sqlx::sqlite::SqliteRow) -> Person {
        Person {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            photo: row.get("photo"),
            entry_created_at: parse_dt(row.get::<String, _>("entry_created_at")),
        }
    }

    fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Tag {
        Tag {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            entry_created_at: parse_dt(row.get::<String, _>("entry_created_at")),
        }
    }
}

pub(crate) fn parse_dt(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn parse_date(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}
