//! Records of the legacy (history-based) chat endpoints.

use crate::types::media::HasAvatar;
use crate::types::timestamp;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParticipantName {
    #[serde(default)]
    pub name: String,
}

/// The character side of a legacy message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SrcChar {
    #[serde(default)]
    pub participant: ParticipantName,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
}

impl SrcChar {
    pub fn name(&self) -> &str {
        &self.participant.name
    }
}

impl HasAvatar for SrcChar {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    replies: Vec<Reply>,
    #[serde(default)]
    src_char: SrcChar,
    #[serde(default)]
    is_final_chunk: bool,
    #[serde(default)]
    last_user_msg_id: Option<i64>,
    #[serde(default)]
    last_user_msg_uuid: Option<String>,
}

/// Final reply of the streaming endpoint. `text`, `uuid`, `id` and `author` are taken
/// from the first reply and the source character when decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMessage")]
pub struct Message {
    pub replies: Vec<Reply>,
    pub src_char: SrcChar,
    pub is_final_chunk: bool,
    pub last_user_msg_id: Option<i64>,
    pub last_user_msg_uuid: Option<String>,
    pub text: String,
    pub uuid: String,
    pub id: Option<i64>,
    pub author: String,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let first = raw.replies.first().cloned().unwrap_or_default();
        let author = raw.src_char.participant.name.clone();
        Self {
            replies: raw.replies,
            src_char: raw.src_char,
            is_final_chunk: raw.is_final_chunk,
            last_user_msg_id: raw.last_user_msg_id,
            last_user_msg_uuid: raw.last_user_msg_uuid,
            text: first.text,
            uuid: first.uuid,
            id: first.id,
            author,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserAccount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_type: Option<String>,
    #[serde(default)]
    pub onboarding_complete: Option<bool>,
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    #[serde(default)]
    pub mobile_onboarding_complete: Option<i64>,
}

impl HasAvatar for UserAccount {
    fn avatar_file_name(&self) -> Option<&str> {
        self.avatar_file_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParticipantUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub account: Option<UserAccount>,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub user: ParticipantUser,
    #[serde(default)]
    pub is_human: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub num_interactions: Option<f64>,
}

/// A message as listed in a chat history.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryMessage {
    #[serde(default, alias = "id ")]
    pub id: Option<i64>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub tgt: Option<String>,
    #[serde(default)]
    pub is_alternative: Option<bool>,
    #[serde(default)]
    pub image_rel_path: Option<String>,
    #[serde(default)]
    pub image_prompt_text: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default, rename = "src__name")]
    pub src_name: Option<String>,
    #[serde(default, rename = "src__user__username")]
    pub src_username: Option<String>,
    #[serde(default, rename = "src__is_human")]
    pub src_is_human: Option<bool>,
    #[serde(default, rename = "src__character__avatar_file_name")]
    pub src_avatar_file_name: Option<String>,
    #[serde(default)]
    pub src_char: Option<SrcChar>,
    #[serde(default, rename = "responsible_user__username")]
    pub responsible_username: Option<String>,
}

#[derive(Deserialize)]
struct RawChat {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    external_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    last_interaction: Option<DateTime<Utc>>,
    #[serde(default, rename = "type")]
    chat_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    messages: Vec<HistoryMessage>,
    #[serde(default)]
    room_img_gen_enabled: Option<bool>,
}

/// A legacy chat, as returned by `chat/history/continue/` and `chat/history/create/`.
///
/// `tgt` is the username of the first non-human participant, the value the streaming
/// endpoint expects as its target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawChat")]
pub struct Chat {
    pub external_id: String,
    pub title: Option<String>,
    pub participants: Vec<Participant>,
    pub created: Option<DateTime<Utc>>,
    pub last_interaction: Option<DateTime<Utc>>,
    pub chat_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub has_more: Option<bool>,
    /// Greeting and initial messages (only on newly created chats).
    pub messages: Vec<HistoryMessage>,
    pub room_img_gen_enabled: Option<bool>,
    pub tgt: Option<String>,
}

impl From<RawChat> for Chat {
    fn from(raw: RawChat) -> Self {
        let tgt = raw
            .participants
            .iter()
            .find(|p| !p.is_human)
            .map(|p| p.user.username.clone())
            .filter(|u| !u.is_empty());
        Self {
            external_id: raw.external_id,
            title: raw.title,
            participants: raw.participants,
            created: raw.created,
            last_interaction: raw.last_interaction,
            chat_type: raw.chat_type,
            description: raw.description,
            status: raw.status,
            has_more: raw.has_more,
            messages: raw.messages,
            room_img_gen_enabled: raw.room_img_gen_enabled,
            tgt,
        }
    }
}

impl Chat {
    pub fn id(&self) -> &str {
        &self.external_id
    }
}

/// A chat listed by `chat/character/histories_v2/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistorySummary {
    #[serde(default)]
    pub external_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub last_interaction: Option<DateTime<Utc>>,
    #[serde(default)]
    pub msgs: Vec<HistoryMessage>,
}

/// One page of `chat/history/msgs/user/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
    #[serde(default)]
    pub next_page: Option<i64>,
    #[serde(default)]
    pub has_more: bool,
}

/// Status of a legacy chat's migration to the turn protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Migration {
    #[serde(default, rename = "migrationId")]
    pub id: String,
    #[serde(default, rename = "createTime", deserialize_with = "timestamp::deserialize")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, rename = "lastUpdateTime", deserialize_with = "timestamp::deserialize")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub properties: Option<String>,
}

/// A character invited to a new room: `value` is its id, `label` its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomCharacter {
    pub value: String,
    pub label: String,
}

impl RoomCharacter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: id.into(),
            label: name.into(),
        }
    }
}

/// Legacy message rating, 0 (worst) to 3 (best). Each maps to a fixed annotation label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Terrible,
    Bad,
    Good,
    Fantastic,
}

impl Rating {
    pub fn label_ids(self) -> [u32; 4] {
        match self {
            Rating::Terrible => [234, 238, 241, 244],
            Rating::Bad => [235, 237, 241, 244],
            Rating::Good => [235, 238, 240, 244],
            Rating::Fantastic => [235, 238, 241, 243],
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Terrible),
            1 => Ok(Rating::Bad),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Fantastic),
            other => Err(Error::invalid_argument(format!(
                "rating must be between 0 and 3, got {other}"
            ))),
        }
    }
}
