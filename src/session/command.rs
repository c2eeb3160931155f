//! Outbound command frames of the chat socket.
//!
//! Every frame is `{"command": <name>, "payload": {...}}`; `create_and_generate_turn`
//! may also carry a top-level `update_primary_candidate`.

use crate::types::chat2::{ChatType, ChatVisibility, TurnKey};
use crate::Result;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CreateChat,
    CreateAndGenerateTurn,
    GenerateTurnCandidate,
    EditTurnCandidate,
    RemoveTurns,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::CreateChat => "create_chat",
            Command::CreateAndGenerateTurn => "create_and_generate_turn",
            Command::GenerateTurnCandidate => "generate_turn_candidate",
            Command::EditTurnCandidate => "edit_turn_candidate",
            Command::RemoveTurns => "remove_turns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFrame<P> {
    pub command: Command,
    pub payload: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_primary_candidate: Option<PrimaryCandidate>,
}

impl<P: Serialize> CommandFrame<P> {
    pub fn new(command: Command, payload: P) -> Self {
        Self {
            command,
            payload,
            update_primary_candidate: None,
        }
    }

    pub fn with_primary(mut self, primary: Option<PrimaryCandidate>) -> Self {
        self.update_primary_candidate = primary;
        self
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Selects which candidate of an earlier turn becomes primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryCandidate {
    pub candidate_id: String,
    pub turn_key: TurnKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSpec {
    pub chat_id: String,
    pub creator_id: String,
    pub visibility: ChatVisibility,
    pub character_id: String,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChat {
    pub chat: ChatSpec,
    pub with_greeting: bool,
}

/// Author of an outgoing turn; serialized as `{}` when nothing is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutgoingAuthor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_human: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingCandidate {
    pub raw_content: String,
    pub tti_image_rel_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingTurn {
    pub turn_key: TurnKey,
    pub author: OutgoingAuthor,
    pub candidates: Vec<OutgoingCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAndGenerateTurn {
    pub character_id: String,
    pub turn: OutgoingTurn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateTurnCandidate {
    pub tts_enabled: bool,
    pub selected_language: String,
    pub character_id: String,
    pub turn_key: TurnKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditTurnCandidate {
    pub turn_key: TurnKey,
    pub new_candidate_raw_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveTurns {
    pub chat_id: String,
    pub turn_ids: Vec<String>,
}
