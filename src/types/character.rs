use crate::types::media::HasAvatar;
use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StarterPrompts {
    #[serde(default)]
    pub phrases: Vec<String>,
}

/// Full character record (`chat/character/info/`, create, update).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub copyable: Option<bool>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub songs: Vec<Value>,
    #[serde(default)]
    pub img_gen_enabled: Option<bool>,
    #[serde(default)]
    pub base_img_prompt: Option<String>,
    #[serde(default)]
    pub img_prompt_regex: Option<String>,
    #[serde(default)]
    pub strip_img_prompt_from_msg: Option<bool>,
    #[serde(default)]
    pub default_voice_id: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub starter_prompts: Option<StarterPrompts>,
    #[serde(default)]
    pub comments_enabled: Option<bool>,
    #[serde(default, rename = "user__username")]
    pub author_username: Option<String>,
    #[serde(default, rename = "participant__name")]
    pub participant_name: Option<String>,
    #[serde(default, rename = "participant__num_interactions")]
    pub num_interactions: Option<f64>,
    #[serde(default, rename = "participant__user__username")]
    pub participant_username: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub upvotes: Option<i64>,
}

impl HasAvatar for Character {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// Character as it appears in listings (upvoted, trending, categories, user pages).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CharacterShort {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    /// Sent as a boolean or as a string depending on the endpoint.
    #[serde(default)]
    pub copyable: Option<Value>,
    #[serde(default, rename = "participant__name")]
    pub name: String,
    #[serde(default, rename = "user__id")]
    pub author_id: Option<i64>,
    #[serde(default, rename = "user__username")]
    pub author_username: Option<String>,
    #[serde(default)]
    pub img_gen_enabled: Option<bool>,
    #[serde(default, rename = "participant__num_interactions")]
    pub num_interactions: Option<f64>,
    #[serde(default)]
    pub default_voice_id: Option<String>,
    #[serde(default)]
    pub upvotes: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub max_last_interaction: Option<DateTime<Utc>>,
}

impl HasAvatar for CharacterShort {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// Curated categories keyed by their display name ("Anime", "Helpers", ...).
pub type Categories = BTreeMap<String, Vec<CharacterShort>>;

/// A character search hit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default, rename = "participant__name")]
    pub name: String,
    #[serde(default, rename = "participant__num_interactions")]
    pub num_interactions: Option<f64>,
    #[serde(default, rename = "user__username")]
    pub author_username: Option<String>,
    #[serde(default)]
    pub priority: Option<f64>,
    #[serde(default)]
    pub search_score: Option<f64>,
    #[serde(default)]
    pub upvotes: Option<i64>,
}

impl HasAvatar for SearchResult {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// A ready-made TTS voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Voice {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub voice_id: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub lang_code: Option<String>,
}

/// Body of `chat/character/create/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCharacter {
    pub name: String,
    pub greeting: String,
    pub title: String,
    /// Legacy identifier; a fresh `id:<uuid>` is generated when empty.
    pub identifier: String,
    pub visibility: String,
    pub copyable: bool,
    pub description: String,
    pub definition: String,
    pub avatar_rel_path: String,
}

impl NewCharacter {
    pub fn new(name: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            greeting: greeting.into(),
            title: String::new(),
            identifier: String::new(),
            visibility: "PRIVATE".to_string(),
            copyable: true,
            description: String::new(),
            definition: String::new(),
            avatar_rel_path: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    pub fn copyable(mut self, copyable: bool) -> Self {
        self.copyable = copyable;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn avatar(mut self, rel_path: impl Into<String>) -> Self {
        self.avatar_rel_path = rel_path.into();
        self
    }
}

/// Changes for `chat/character/update/`; unset fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_img_prompt_from_msg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_img_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_gen_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_rel_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}
