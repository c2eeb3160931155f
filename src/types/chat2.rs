//! Records of the turn-based chat protocol (neo host and chat socket).

use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat id plus turn id; the turn id is absent on turns the client is about to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnKey {
    #[serde(default)]
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_id: Option<String>,
}

impl TurnKey {
    pub fn new(chat_id: impl Into<String>, turn_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            turn_id: Some(turn_id.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_human: Option<bool>,
}

impl Author {
    /// Human accounts have purely numeric ids; characters do not.
    pub fn is_human(&self) -> bool {
        self.is_human == Some(true)
            || (!self.author_id.is_empty() && self.author_id.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One generated variant of a turn.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub candidate_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub raw_content: String,
    #[serde(default)]
    pub editor: Option<Editor>,
    /// Present (and true) only on the last chunk of a generated candidate.
    #[serde(default)]
    pub is_final: Option<bool>,
    #[serde(default)]
    pub base_candidate_id: Option<String>,
}

#[derive(Deserialize)]
struct RawTurn {
    #[serde(default)]
    turn_key: TurnKey,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    last_update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    author: Author,
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    primary_candidate_id: Option<String>,
    #[serde(default)]
    is_pinned: Option<bool>,
}

/// A single exchange unit of a chat.
///
/// The primary candidate is chosen once at decode time: the candidate whose id matches
/// `primary_candidate_id`, else the first one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTurn")]
pub struct Turn {
    pub turn_key: TurnKey,
    pub create_time: Option<DateTime<Utc>>,
    pub last_update_time: Option<DateTime<Utc>>,
    pub state: Option<String>,
    pub author: Author,
    pub candidates: Vec<Candidate>,
    pub primary_candidate_id: Option<String>,
    pub is_pinned: bool,
    primary: Option<usize>,
}

impl From<RawTurn> for Turn {
    fn from(raw: RawTurn) -> Self {
        let primary = raw
            .primary_candidate_id
            .as_deref()
            .and_then(|id| raw.candidates.iter().position(|c| c.candidate_id == id))
            .or_else(|| (!raw.candidates.is_empty()).then_some(0));

        Self {
            turn_key: raw.turn_key,
            create_time: raw.create_time,
            last_update_time: raw.last_update_time,
            state: raw.state,
            author: raw.author,
            candidates: raw.candidates,
            primary_candidate_id: raw.primary_candidate_id,
            is_pinned: raw.is_pinned.unwrap_or(false),
            primary,
        }
    }
}

impl Turn {
    pub fn primary_candidate(&self) -> Option<&Candidate> {
        self.primary.and_then(|i| self.candidates.get(i))
    }

    /// Text of the primary candidate.
    pub fn text(&self) -> &str {
        self.primary_candidate()
            .map(|c| c.raw_content.as_str())
            .unwrap_or_default()
    }

    /// Id of the primary candidate.
    pub fn candidate_id(&self) -> &str {
        self.primary_candidate()
            .map(|c| c.candidate_id.as_str())
            .unwrap_or_default()
    }

    pub fn chat_id(&self) -> &str {
        &self.turn_key.chat_id
    }

    pub fn turn_id(&self) -> &str {
        self.turn_key.turn_id.as_deref().unwrap_or_default()
    }

    /// Author display name.
    pub fn name(&self) -> &str {
        &self.author.name
    }

    pub fn is_final(&self) -> bool {
        self.primary_candidate()
            .and_then(|c| c.is_final)
            .unwrap_or(false)
    }

    pub fn is_from_human(&self) -> bool {
        self.author.is_human()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatVisibility {
    #[default]
    #[serde(rename = "VISIBILITY_PRIVATE")]
    Private,
    #[serde(rename = "VISIBILITY_UNLISTED")]
    Unlisted,
    #[serde(rename = "VISIBILITY_PUBLIC")]
    Public,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatType {
    #[default]
    #[serde(rename = "TYPE_ONE_ON_ONE")]
    OneOnOne,
    #[serde(rename = "TYPE_ROOM")]
    Room,
    #[serde(other)]
    Unknown,
}

/// Chat metadata, as returned by `create_chat` and the neo chat listings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatData {
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
    pub preview_turns: Vec<Turn>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryMeta {
    #[serde(default)]
    pub next_token: Option<String>,
}

/// One page of a chat's turns, newest first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TurnHistory {
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub meta: HistoryMeta,
}
