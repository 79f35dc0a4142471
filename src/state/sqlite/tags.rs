use async_trait::async_trait;

use super::SqliteStateStore;
use crate::traits::{Tag, TagPatch, TagStore};

#[async_trait]
impl TagStore for SqliteStateStore {
    async fn create_tag(&self, name: &str, description: Option<&str>) -> anyhow::Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        // The UNIQUE constraint on name surfaces duplicates as an error here.
        let result =
            sqlx::query("INSERT INTO tags (name, description, entry_created_at) VALUES (?, ?, ?)")
                .bind(name)
                .bind(description)
                .bind(&now)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_tag(&self, id: i64) -> anyhow::Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, description, entry_created_at FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Self::row_to_tag(&r)))
    }

    async fn get_all_tags(&self) -> anyhow::Result<Vec<Tag>> {
        let rows =
            sqlx::query("SELECT id, name, description, entry_created_at FROM tags ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.iter().map(Self::row_to_tag).collect())
    }

    async fn get_tags_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Tag>> {
        let mut tags = Vec::new();
        for id in ids {
            if let Some(tag) = self.get_tag(*id).await? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    async fn update_tag(&self, id: i64, patch: &TagPatch) -> anyhow::Result<bool> {
        let Some(existing) = self.get_tag(id).await? else {
            return Ok(false);
        };

        let name = patch.name.clone().unwrap_or(existing.name);
        let description = patch
            .description
            .clone()
            .unwrap_or(existing.description);

        sqlx::query("UPDATE tags SET name = ?, description = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    async fn delete_tag(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
