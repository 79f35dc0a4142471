use async_trait::async_trait;
use chrono::NaiveDate;

use super::records::{Dream, DreamPatch, Person, PersonDreamCount, PersonPatch, Tag, TagPatch};

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn create_person(
        &self,
        name: &str,
        description: Option<&str>,
        photo: Option<&str>,
    ) -> anyhow::Result<i64>;

    async fn get_person(&self, id: i64) -> anyhow::Result<Option<Person>>;

    /// All persons, ordered by name.
    async fn get_all_persons(&self) -> anyhow::Result<Vec<Person>>;

    /// Resolve a batch of ids, preserving input order. Unknown ids are
    /// simply missing from the result.
    async fn get_persons_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Person>>;

    /// Returns false when no person with that id exists.
    async fn update_person(&self, id: i64, patch: &PersonPatch) -> anyhow::Result<bool>;

    /// Deleting a person removes its dream-membership links, never the dreams.
    async fn delete_person(&self, id: i64) -> anyhow::Result<bool>;

    /// All persons with their dream counts, ordered by name.
    async fn person_dream_counts(&self) -> anyhow::Result<Vec<PersonDreamCount>>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    /// Fails on a duplicate name — tag names are unique at the store.
    async fn create_tag(&self, name: &str, description: Option<&str>) -> anyhow::Result<i64>;

    async fn get_tag(&self, id: i64) -> anyhow::Result<Option<Tag>>;

    /// All tags, ordered by name.
    async fn get_all_tags(&self) -> anyhow::Result<Vec<Tag>>;

    async fn get_tags_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Tag>>;

    async fn update_tag(&self, id: i64, patch: &TagPatch) -> anyhow::Result<bool>;

    async fn delete_tag(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait DreamStore: Send + Sync {
    async fn create_dream(
        &self,
        description: &str,
        dream_date: Option<NaiveDate>,
    ) -> anyhow::Result<i64>;

    async fn get_dream(&self, id: i64) -> anyhow::Result<Option<Dream>>;

    /// All dreams, most recent first (dream_date desc, then creation time desc;
    /// undated dreams sort last).
    async fn get_all_dreams(&self) -> anyhow::Result<Vec<Dream>>;

    /// The `limit` most recently created dreams.
    async fn latest_dreams(&self, limit: i64) -> anyhow::Result<Vec<Dream>>;

    async fn update_dream(&self, id: i64, patch: &DreamPatch) -> anyhow::Result<bool>;

    /// Replace the dream's person membership set with exactly the given ids.
    /// Ids that do not name an existing person are dropped silently.
    async fn set_dream_persons(&self, dream_id: i64, person_ids: &[i64]) -> anyhow::Result<()>;

    /// Replace the dream's tag membership set. Same silent-drop policy.
    async fn set_dream_tags(&self, dream_id: i64, tag_ids: &[i64]) -> anyhow::Result<()>;

    async fn delete_dream(&self, id: i64) -> anyhow::Result<bool>;
}
