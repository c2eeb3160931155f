use crate::types::chat2::{ChatType, ChatVisibility};
use crate::types::media::HasAvatar;
use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A recent turn-protocol chat (`chats/recent/` on the neo host).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecentChat {
    #[serde(default)]
    pub chat_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_id: String,
    #[serde(default)]
    pub character_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "type")]
    pub chat_type: ChatType,
    #[serde(default)]
    pub visibility: ChatVisibility,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub character_visibility: Option<String>,
    /// Translated character fields keyed by field, then by locale.
    #[serde(default)]
    pub character_translations: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub default_voice_id: Option<String>,
    #[serde(default, rename = "character_avatar_uri")]
    pub avatar_file_name: Option<String>,
}

impl HasAvatar for RecentChat {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoomParticipant {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
}

impl HasAvatar for RoomParticipant {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

/// A recent legacy room (`chat/rooms/recent/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecentRoom {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<RoomParticipant>,
    #[serde(default)]
    pub img_gen_enabled: Option<bool>,
}
