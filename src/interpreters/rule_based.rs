use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::traits::{DreamInterpreter, PersonStore, Suggestions, TagStore};

/// Keyword heuristics per tag concept. A concept only fires when a tag with
/// that name actually exists in the store.
const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("lucid", &["lucid", "aware", "control", "realize", "wake up"]),
    (
        "nightmare",
        &["nightmare", "scary", "fear", "monster", "chase", "anxiety"],
    ),
    (
        "fantasy",
        &["flying", "magic", "mythical", "dragon", "unicorn", "adventure"],
    ),
    (
        "realistic",
        &["work", "school", "daily life", "routine", "normal"],
    ),
];

/// How much of the dream text is echoed back in the interpretation string.
const PREVIEW_CHARS: usize = 100;

/// Rule-based interpretation engine. Matches capitalized tokens against
/// stored person names and scans for tag keywords; the interpretation text
/// and image URL are deterministic placeholders standing in for a future
/// model-backed engine.
pub struct RuleBasedInterpreter {
    persons: Arc<dyn PersonStore>,
    tags: Arc<dyn TagStore>,
    name_pattern: Regex,
}

impl RuleBasedInterpreter {
    pub fn new(persons: Arc<dyn PersonStore>, tags: Arc<dyn TagStore>) -> Self {
        Self {
            persons,
            tags,
            // One uppercase letter followed by lowercase letters, word-bounded.
            name_pattern: Regex::new(r"\b[A-Z][a-z]+\b").expect("valid name pattern"),
        }
    }

    fn interpretation_text(description: &str) -> String {
        let preview: String = description.chars().take(PREVIEW_CHARS).collect();
        format!(
            "AI Interpretation for '{preview}...': This dream suggests deep subconscious \
             processing related to [themes like freedom, anxiety, transformation, etc.]."
        )
    }
}

#[async_trait]
impl DreamInterpreter for RuleBasedInterpreter {
    async fn analyze(&self, description: &str) -> anyhow::Result<Suggestions> {
        if description.is_empty() {
            return Ok(Suggestions::default());
        }

        let mut suggestions = Suggestions {
            interpretation: Self::interpretation_text(description),
            ..Default::default()
        };

        // Capitalized tokens either match a stored person (case-insensitive)
        // or become a candidate new person name, case preserved.
        let persons = self.persons.get_all_persons().await?;
        let name_to_id: HashMap<String, i64> = persons
            .iter()
            .map(|p| (p.name.to_lowercase(), p.id))
            .collect();

        for token in self.name_pattern.find_iter(description) {
            let token = token.as_str();
            match name_to_id.get(&token.to_lowercase()) {
                Some(id) => {
                    if !suggestions.person_ids.contains(id) {
                        suggestions.person_ids.push(*id);
                    }
                }
                None => {
                    if !suggestions.new_person_names.iter().any(|n| n == token) {
                        suggestions.new_person_names.push(token.to_string());
                    }
                }
            }
        }

        let tags = self.tags.get_all_tags().await?;
        let tag_name_to_id: HashMap<String, i64> =
            tags.iter().map(|t| (t.name.to_lowercase(), t.id)).collect();

        let description_lower = description.to_lowercase();
        for (concept, keywords) in TAG_KEYWORDS {
            let Some(tag_id) = tag_name_to_id.get(*concept) else {
                continue;
            };
            // First keyword hit wins; the rest are skipped.
            if keywords.iter().any(|kw| description_lower.contains(kw))
                && !suggestions.tag_ids.contains(tag_id)
            {
                suggestions.tag_ids.push(*tag_id);
            }
        }

        Ok(suggestions)
    }

    async fn generate_image(
        &self,
        _description: &str,
        _interpretation: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        // No actual generation happens in the rule-based engine.
        Ok(Some("/static/images/dream_placeholder.png".to_string()))
    }
}
