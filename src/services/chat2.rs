use crate::services::{decode, field, query, ServiceContext};
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::chat2::{ChatData, Turn, TurnHistory, TurnKey};
use crate::{Error, Result};
use serde_json::{json, Value};

/// Turn-protocol chats over the neo REST host. Messaging itself goes through
/// [`crate::session::ChatSession`].
#[derive(Debug, Clone, Copy)]
pub struct Chat2Service<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> Chat2Service<'a> {
    pub(crate) fn new(transport: &'a HttpTransport) -> Self {
        Self {
            ctx: ServiceContext::new(transport),
        }
    }

    pub fn with_token(self, token: &'a str) -> Self {
        Self {
            ctx: self.ctx.with_token(token),
        }
    }

    async fn neo_get(&self, path: String) -> Result<Value> {
        self.ctx.call(ApiRequest::get(path).neo()).await
    }

    async fn neo_post(&self, path: &str, body: Value) -> Result<Value> {
        self.ctx.call(ApiRequest::post(path, body).neo()).await
    }

    /// Chats with a character, each carrying up to `preview` recent turns.
    pub async fn histories(&self, character_id: &str, preview: u32) -> Result<Vec<ChatData>> {
        let data = self
            .neo_get(format!(
                "chats/?character_ids={}&num_preview_turns={preview}",
                query(character_id)
            ))
            .await?;
        field(data, "chats")
    }

    pub async fn history(&self, chat_id: &str) -> Result<TurnHistory> {
        decode(self.neo_get(format!("turns/{chat_id}/")).await?, "turn history")
    }

    /// The most recent chat with a character.
    pub async fn latest_chat(&self, character_id: &str) -> Result<ChatData> {
        let chats: Vec<ChatData> = field(
            self.neo_get(format!("chats/recent/{character_id}")).await?,
            "chats",
        )?;
        chats
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("no chat with character {character_id}")))
    }

    pub async fn pin(&self, pinned: bool, chat_id: &str, turn_id: &str) -> Result<Turn> {
        let data = self
            .neo_post(
                "turn/pin",
                json!({
                    "is_pinned": pinned,
                    "turn_key": TurnKey::new(chat_id, turn_id),
                }),
            )
            .await?;
        field(data, "turn")
    }

    /// Star-rate a candidate. The value is passed through unchecked.
    pub async fn rate(&self, stars: u8, chat_id: &str, turn_id: &str, candidate_id: &str) -> Result<()> {
        self.neo_post(
            "annotation/create",
            json!({
                "turn_key": TurnKey::new(chat_id, turn_id),
                "candidate_id": candidate_id,
                "annotation": {
                    "annotation_type": "star",
                    "annotation_value": stars,
                },
            }),
        )
        .await?;
        Ok(())
    }
}
