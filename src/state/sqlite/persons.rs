use async_trait::async_trait;
use sqlx::Row;

use super::SqliteStateStore;
use crate::traits::{Person, PersonDreamCount, PersonPatch, PersonStore};

#[async_trait]
impl PersonStore for SqliteStateStore {
    async fn create_person(
        &self,
        name: &str,
        description: Option<&str>,
        photo: Option<&str>,
    ) -> anyhow::Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO persons (name, description, photo, entry_created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(photo)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_person(&self, id: i64) -> anyhow::Result<Option<Person>> {
        let row = sqlx::query(
            "SELECT id, name, description, photo, entry_created_at FROM persons WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| Self::row_to_person(&r)))
    }

    async fn get_all_persons(&self) -> anyhow::Result<Vec<Person>> {
        let rows = sqlx::query(
            "SELECT id, name, description, photo, entry_created_at FROM persons ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(Self::row_to_person).collect())
    }

    async fn get_persons_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Person>> {
        let mut persons = Vec::new();
        for id in ids {
            if let Some(person) = self.get_person(*id).await? {
                persons.push(person);
            }
        }
        Ok(persons)
    }

    async fn update_person(&self, id: i64, patch: &PersonPatch) -> anyhow::Result<bool> {
        let Some(existing) = self.get_person(id).await? else {
            return Ok(false);
        };

        let name = patch.name.clone().unwrap_or(existing.name);
        let description = patch
            .description
            .clone()
            .unwrap_or(existing.description);
        let photo = patch.photo.clone().unwrap_or(existing.photo);

        sqlx::query("UPDATE persons SET name = ?, description = ?, photo = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(&photo)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    async fn delete_person(&self, id: i64) -> anyhow::Result<bool> {
        // dream_persons rows go via ON DELETE CASCADE; dreams stay.
        let result = sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn person_dream_counts(&self) -> anyhow::Result<Vec<PersonDreamCount>> {
        let rows = sqlx::query(
            "SELECT p.id, p.name, p.photo, COUNT(dp.dream_id) AS qty_dreams \
             FROM persons p LEFT JOIN dream_persons dp ON dp.person_id = p.id \
             GROUP BY p.id ORDER BY p.name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| PersonDreamCount {
                id: r.get("id"),
                name: r.get("name"),
                photo: r.get("photo"),
                qty_dreams: r.get("qty_dreams"),
            })
            .collect())
    }
}
