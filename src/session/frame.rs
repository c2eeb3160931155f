use crate::types::chat2::{ChatData, Turn};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// A bidirectional JSON frame channel. [`crate::transport::WsConnection`] is the
/// production implementation; tests and embedders may supply their own.
#[async_trait]
pub trait FrameTransport: Send {
    async fn send_frame(&mut self, frame: Value) -> Result<()>;

    /// Next inbound frame, in arrival order.
    async fn recv_frame(&mut self) -> Result<Value>;

    async fn close(&mut self) -> Result<()>;
}

/// An inbound frame, classified by the key it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Turn(Box<Turn>),
    Chat(Box<ChatData>),
    /// `neo_error` or a bare `comment`.
    Error(String),
    Other(Value),
}

impl InboundFrame {
    pub fn classify(value: Value) -> Result<Self> {
        if value.get("command").and_then(Value::as_str) == Some("neo_error") {
            return Ok(InboundFrame::Error(comment_of(&value, "neo_error")));
        }
        if let Some(turn) = value.get("turn").filter(|t| !t.is_null()) {
            let turn = decode_turn(turn, &value)?;
            return Ok(InboundFrame::Turn(Box::new(turn)));
        }
        if let Some(chat) = value.get("chat").filter(|c| !c.is_null()) {
            let chat: ChatData = serde_json::from_value(chat.clone())
                .map_err(|e| Error::malformed(format!("undecodable chat: {e}"), value.to_string()))?;
            return Ok(InboundFrame::Chat(Box::new(chat)));
        }
        if value.get("comment").is_some_and(|c| !c.is_null()) {
            return Ok(InboundFrame::Error(comment_of(&value, "error")));
        }
        Ok(InboundFrame::Other(value))
    }
}

fn decode_turn(turn: &Value, frame: &Value) -> Result<Turn> {
    serde_json::from_value(turn.clone())
        .map_err(|e| Error::malformed(format!("undecodable turn: {e}"), frame.to_string()))
}

fn comment_of(value: &Value, fallback: &str) -> String {
    match value.get("comment") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_by_key() {
        let turn = InboundFrame::classify(json!({
            "command": "add_turn",
            "turn": {"turn_key": {"chat_id": "c", "turn_id": "t"}, "author": {"author_id": "x"}}
        }))
        .unwrap();
        assert!(matches!(turn, InboundFrame::Turn(_)));

        let chat = InboundFrame::classify(json!({"command": "create_chat_response", "chat": {"chat_id": "c"}}))
            .unwrap();
        assert!(matches!(chat, InboundFrame::Chat(ref c) if c.chat_id == "c"));

        assert_eq!(
            InboundFrame::classify(json!({"command": "neo_error", "comment": "no such chat"})).unwrap(),
            InboundFrame::Error("no such chat".into())
        );
        assert_eq!(
            InboundFrame::classify(json!({"comment": "rate limited"})).unwrap(),
            InboundFrame::Error("rate limited".into())
        );
        assert!(matches!(
            InboundFrame::classify(json!({"command": "ok"})).unwrap(),
            InboundFrame::Other(_)
        ));
    }

    #[test]
    fn neo_error_wins_over_turn() {
        let frame = json!({"command": "neo_error", "turn": {}, "comment": "bad turn"});
        assert_eq!(
            InboundFrame::classify(frame).unwrap(),
            InboundFrame::Error("bad turn".into())
        );
    }
}
