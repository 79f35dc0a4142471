use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

use super::{parse_date, parse_dt, SqliteStateStore};
use crate::traits::{Dream, DreamPatch, DreamStore};

const DREAM_COLUMNS: &str =
    "id, description, dream_date, entry_created_at, ai_interpretation, generated_image_url";

impl SqliteStateStore {
    fn row_to_dream(row: &sqlx::sqlite::SqliteRow) -> Dream {
        Dream {
            id: row.get("id"),
            description: row.get("description"),
            dream_date: parse_date(row.get("dream_date")),
            entry_created_at: parse_dt(row.get::<String, _>("entry_created_at")),
            ai_interpretation: row.get("ai_interpretation"),
            generated_image_url: row.get("generated_image_url"),
            persons: Vec::new(),
            tags: Vec::new(),
        }
    }

    async fn load_dream_relations(&self, dream: &mut Dream) -> anyhow::Result<()> {
        let person_rows = sqlx::query(
            "SELECT p.id, p.name, p.description, p.photo, p.entry_created_at \
             FROM persons p JOIN dream_persons dp ON dp.person_id = p.id \
             WHERE dp.dream_id = ? ORDER BY p.name ASC",
        )
        .bind(dream.id)
        .fetch_all(&self.pool)
        .await?;
        dream.persons = person_rows.iter().map(Self::row_to_person).collect();

        let tag_rows = sqlx::query(
            "SELECT t.id, t.name, t.description, t.entry_created_at \
             FROM tags t JOIN dream_tags dt ON dt.tag_id = t.id \
             WHERE dt.dream_id = ? ORDER BY t.name ASC",
        )
        .bind(dream.id)
        .fetch_all(&self.pool)
        .await?;
        dream.tags = tag_rows.iter().map(Self::row_to_tag).collect();

        Ok(())
    }

    async fn dreams_with_relations(
        &self,
        rows: Vec<sqlx::sqlite::SqliteRow>,
    ) -> anyhow::Result<Vec<Dream>> {
        let mut dreams = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut dream = Self::row_to_dream(row);
            self.load_dream_relations(&mut dream).await?;
            dreams.push(dream);
        }
        Ok(dreams)
    }

    /// Replace a membership set inside one transaction. The insert only
    /// fires for ids that exist in the parent table, so unknown ids vanish
    /// without an error, and the join-table primary key dedups repeats.
    async fn replace_links(
        &self,
        link_table: &str,
        parent_table: &str,
        link_column: &str,
        dream_id: i64,
        ids: &[i64],
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {link_table} WHERE dream_id = ?"))
            .bind(dream_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT OR IGNORE INTO {link_table} (dream_id, {link_column}) \
             SELECT ?, id FROM {parent_table} WHERE id = ?"
        );
        for id in ids {
            sqlx::query(&insert)
                .bind(dream_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl DreamStore for SqliteStateStore {
    async fn create_dream(
        &self,
        description: &str,
        dream_date: Option<NaiveDate>,
    ) -> anyhow::Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO dreams (description, dream_date, entry_created_at) VALUES (?, ?, ?)",
        )
        .bind(description)
        .bind(dream_date.map(|d| d.to_string()))
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_dream(&self, id: i64) -> anyhow::Result<Option<Dream>> {
        let row = sqlx::query(&format!("SELECT {DREAM_COLUMNS} FROM dreams WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => {
                let mut dream = Self::row_to_dream(&r);
                self.load_dream_relations(&mut dream).await?;
                Ok(Some(dream))
            }
            None => Ok(None),
        }
    }

    async fn get_all_dreams(&self) -> anyhow::Result<Vec<Dream>> {
        // SQLite sorts NULL smallest, so DESC puts undated dreams last.
        let rows = sqlx::query(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams ORDER BY dream_date DESC, entry_created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.dreams_with_relations(rows).await
    }

    async fn latest_dreams(&self, limit: i64) -> anyhow::Result<Vec<Dream>> {
        let rows = sqlx::query(&format!(
            "SELECT {DREAM_COLUMNS} FROM dreams ORDER BY entry_created_at DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        self.dreams_with_relations(rows).await
    }

    async fn update_dream(&self, id: i64, patch: &DreamPatch) -> anyhow::Result<bool> {
        let row = sqlx::query("SELECT description, dream_date FROM dreams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };

        let description = patch
            .description
            .clone()
            .unwrap_or_else(|| row.get("description"));
        let dream_date = patch
            .dream_date
            .map(|d| d.to_string())
            .or_else(|| row.get("dream_date"));

        sqlx::query("UPDATE dreams SET description = ?, dream_date = ? WHERE id = ?")
            .bind(&description)
            .bind(&dream_date)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    async fn set_dream_persons(&self, dream_id: i64, person_ids: &[i64]) -> anyhow::Result<()> {
        self.replace_links("dream_persons", "persons", "person_id", dream_id, person_ids)
            .await
    }

    async fn set_dream_tags(&self, dream_id: i64, tag_ids: &[i64]) -> anyhow::Result<()> {
        self.replace_links("dream_tags", "tags", "tag_id", dream_id, tag_ids)
            .await
    }

    async fn delete_dream(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM dreams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
