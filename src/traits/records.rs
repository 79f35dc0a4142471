use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A person appearing in dreams — a real individual, fictional character,
/// or archetype. Names are not unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Path or URL to a photo. Storage of the actual bytes lives elsewhere.
    pub photo: Option<String>,
    pub entry_created_at: DateTime<Utc>,
}

/// A descriptive label for dreams ('Lucid', 'Nightmare', ...). Names are
/// unique across all tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub entry_created_at: DateTime<Utc>,
}

/// A single dream entry with its person and tag memberships loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dream {
    pub id: i64,
    pub description: String,
    /// The date the dream occurred on, as reported by the user.
    pub dream_date: Option<NaiveDate>,
    pub entry_created_at: DateTime<Utc>,
    pub ai_interpretation: Option<String>,
    pub generated_image_url: Option<String>,
    pub persons: Vec<Person>,
    pub tags: Vec<Tag>,
}

/// Partial update for a person. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub photo: Option<Option<String>>,
}

/// Partial update for a tag.
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Partial scalar update for a dream. Relation changes go through the
/// membership-set operations, not through this patch.
#[derive(Debug, Clone, Default)]
pub struct DreamPatch {
    pub description: Option<String>,
    pub dream_date: Option<NaiveDate>,
}

/// Dashboard projection: a person plus how many dreams reference them.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDreamCount {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub qty_dreams: i64,
}
