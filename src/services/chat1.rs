//! Legacy history-based chat over the REST host.

use crate::services::{decode, field, query, ServiceContext};
use crate::transport::{stream, ApiRequest, Envelope, HttpTransport};
use crate::types::character::SearchResult;
use crate::types::chat1::{Chat, HistoryPage, HistorySummary, Message, Migration, Rating, RoomCharacter};
use crate::{Error, Result};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Extra knobs for a legacy streamed message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    /// Return the text generated before a filter abort instead of failing with
    /// [`Error::Filtered`].
    pub non_filtering: bool,
    pub primary_msg_uuid: Option<String>,
    pub image_rel_path: Option<String>,
    /// Additional raw body fields, sent as-is.
    pub extra: Map<String, Value>,
}

impl MessageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_filtering(mut self) -> Self {
        self.non_filtering = true;
        self
    }

    pub fn primary_msg_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.primary_msg_uuid = Some(uuid.into());
        self
    }

    pub fn image(mut self, rel_path: impl Into<String>) -> Self {
        self.image_rel_path = Some(rel_path.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    fn apply(&self, body: &mut Map<String, Value>) {
        if let Some(uuid) = &self.primary_msg_uuid {
            body.insert("primary_msg_uuid".into(), Value::String(uuid.clone()));
        }
        if let Some(path) = &self.image_rel_path {
            body.insert("image_rel_path".into(), Value::String(path.clone()));
        }
        for (key, value) in &self.extra {
            body.insert(key.clone(), value.clone());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chat1Service<'a> {
    ctx: ServiceContext<'a>,
}

impl<'a> Chat1Service<'a> {
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

    /// Send `text` to the character `tgt` in chat `chat_id` and wait for the full reply.
    pub async fn send_message(
        &self,
        chat_id: &str,
        tgt: &str,
        text: &str,
        options: &MessageOptions,
    ) -> Result<Message> {
        let mut body = Map::new();
        body.insert("history_external_id".into(), json!(chat_id));
        body.insert("text".into(), json!(text));
        body.insert("tgt".into(), json!(tgt));
        options.apply(&mut body);
        self.stream(body, options.non_filtering).await
    }

    /// Generate an alternative reply to the message `parent_msg_uuid`.
    pub async fn next_message(
        &self,
        chat_id: &str,
        tgt: &str,
        parent_msg_uuid: &str,
        options: &MessageOptions,
    ) -> Result<Message> {
        let mut body = Map::new();
        body.insert("history_external_id".into(), json!(chat_id));
        body.insert("parent_msg_uuid".into(), json!(parent_msg_uuid));
        body.insert("tgt".into(), json!(tgt));
        options.apply(&mut body);
        self.stream(body, options.non_filtering).await
    }

    async fn stream(&self, body: Map<String, Value>, non_filtering: bool) -> Result<Message> {
        let req = ApiRequest::post("chat/streaming/", Value::Object(body))
            .streamed()
            .token(self.ctx.token());
        let text = self.ctx.transport().request_text(req).await?;
        debug!(
            endpoint = "chat/streaming/",
            lines = stream::lines(&text).len(),
            non_filtering,
            "streamed reply received"
        );

        let reply = stream::final_reply(&text, non_filtering)?;
        let reply = Envelope::classify(reply).into_result()?;
        decode(reply, "message")
    }

    /// Continue the chat `chat_id`, or the most recent chat with the character when `None`.
    pub async fn get_chat(&self, character_id: &str, chat_id: Option<&str>) -> Result<Chat> {
        let data = self
            .ctx
            .post(
                "chat/history/continue/",
                json!({
                    "character_external_id": character_id,
                    "history_external_id": chat_id,
                }),
            )
            .await?;
        decode(data, "chat")
    }

    pub async fn new_chat(&self, character_id: &str) -> Result<Chat> {
        let chat: Chat = decode(
            self.ctx
                .post(
                    "chat/history/create/",
                    json!({ "character_external_id": character_id }),
                )
                .await?,
            "chat",
        )?;
        info!(chat_id = chat.id(), "legacy chat created");
        Ok(chat)
    }

    pub async fn histories(&self, character_id: &str, number: u32) -> Result<Vec<HistorySummary>> {
        field(
            self.ctx
                .post(
                    "chat/character/histories_v2/",
                    json!({ "external_id": character_id, "number": number }),
                )
                .await?,
            "histories",
        )
    }

    pub async fn history(&self, chat_id: &str) -> Result<HistoryPage> {
        decode(
            self.ctx
                .get(format!(
                    "chat/history/msgs/user/?history_external_id={}",
                    query(chat_id)
                ))
                .await?,
            "history",
        )
    }

    pub async fn delete_messages<S: AsRef<str>>(&self, chat_id: &str, uuids: &[S]) -> Result<()> {
        if uuids.is_empty() {
            return Err(Error::invalid_argument("no message uuids to delete"));
        }
        let uuids: Vec<&str> = uuids.iter().map(AsRef::as_ref).collect();
        self.ctx
            .post(
                "chat/history/msgs/delete/",
                json!({ "history_id": chat_id, "uuids_to_delete": uuids }),
            )
            .await?;
        Ok(())
    }

    /// Start migrating a legacy chat to the turn protocol and report its status.
    pub async fn migrate(&self, chat_id: &str) -> Result<Migration> {
        let path = format!("migration/{chat_id}");
        self.ctx
            .call(ApiRequest::post(path.clone(), Value::Bool(true)).neo())
            .await?;
        let data = self.ctx.call(ApiRequest::get(path).neo()).await?;
        field(data, "migration")
    }

    /// Rate a reply from 0 (terrible) to 3 (fantastic).
    pub async fn rate(&self, rating: u8, history_id: &str, message_uuid: &str) -> Result<()> {
        let rating = Rating::try_from(rating)?;
        self.ctx
            .call(ApiRequest::put(
                "chat/annotations/label/",
                json!({
                    "label_ids": rating.label_ids(),
                    "history_external_id": history_id,
                    "message_uuid": message_uuid,
                }),
            ))
            .await?;
        Ok(())
    }

    /// Create a private room with several characters; returns the room id.
    pub async fn create_room(
        &self,
        name: &str,
        characters: &[RoomCharacter],
        topic: &str,
    ) -> Result<String> {
        let data = self
            .ctx
            .post(
                "chat/room/create/",
                json!({
                    "characters": characters,
                    "name": name,
                    "topic": topic,
                    "visibility": "PRIVATE",
                }),
            )
            .await?;
        match data["room"]["external_id"].as_str() {
            Some(id) => Ok(id.to_string()),
            None => Err(Error::malformed("response has no `room.external_id`", data.to_string())),
        }
    }

    pub async fn search(&self, text: &str) -> Result<Vec<SearchResult>> {
        field(
            self.ctx
                .get(format!("chat/characters/search/?query={}", query(text)))
                .await?,
            "characters",
        )
    }
}
