use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Structured output of a dream-text analysis: a textual interpretation plus
/// suggested associations for the client to accept or discard. All lists are
/// deduplicated and keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suggestions {
    pub interpretation: String,
    /// Ids of existing persons whose names appear in the text.
    pub person_ids: Vec<i64>,
    /// Capitalized tokens that matched no stored person, case preserved.
    pub new_person_names: Vec<String>,
    /// Ids of existing tags whose keyword sets hit the text.
    pub tag_ids: Vec<i64>,
}

/// Interpretation engine capability. Concrete engines (the rule-based one
/// here, model-backed ones later) are swapped behind this trait without
/// touching callers.
#[async_trait]
pub trait DreamInterpreter: Send + Sync {
    /// Analyze a dream description. Empty input yields an all-empty bundle,
    /// not an error. Performs read-only store lookups, no writes.
    async fn analyze(&self, description: &str) -> anyhow::Result<Suggestions>;

    /// Produce an image reference for the dream, or None when the engine
    /// cannot generate one.
    async fn generate_image(
        &self,
        description: &str,
        interpretation: Option<&str>,
    ) -> anyhow::Result<Option<String>>;
}
