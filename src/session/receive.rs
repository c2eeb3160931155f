//! Receive loops correlating inbound frames with the command in flight.

use crate::session::command::Command;
use crate::session::frame::{FrameTransport, InboundFrame};
use crate::types::chat2::Turn;
use crate::{Error, ErrorContext, Result};
use tracing::debug;

fn context(command: Command) -> ErrorContext {
    ErrorContext::new()
        .with_endpoint(command.as_str())
        .with_source("session")
}

/// Why a receive loop stopped without a result.
#[derive(Debug)]
pub(crate) enum Interrupted {
    /// The service answered the command with an error frame. Nothing more of the
    /// command is left on the socket.
    Rejected(Error),
    /// The loop stopped partway through the command's frames: the socket failed, a frame
    /// did not decode, or a frame arrived that the command never produces.
    Desynced(Error),
}

impl Interrupted {
    pub(crate) fn into_error(self) -> Error {
        match self {
            Interrupted::Rejected(e) | Interrupted::Desynced(e) => e,
        }
    }
}

/// Read until the first finalized, character-authored turn.
///
/// Human turns (the echo of our own message) and partial chunks are skipped. An error
/// frame ends the wait immediately; so does any frame carrying neither a turn nor an
/// error, since nothing else is expected while a turn is being generated.
pub async fn await_final_turn<T>(transport: &mut T, command: Command) -> Result<Turn>
where
    T: FrameTransport + ?Sized,
{
    final_turn(transport, command)
        .await
        .map_err(Interrupted::into_error)
}

pub(crate) async fn final_turn<T>(
    transport: &mut T,
    command: Command,
) -> std::result::Result<Turn, Interrupted>
where
    T: FrameTransport + ?Sized,
{
    let mut skipped = 0usize;
    loop {
        let frame = transport.recv_frame().await.map_err(Interrupted::Desynced)?;
        match InboundFrame::classify(frame).map_err(Interrupted::Desynced)? {
            InboundFrame::Turn(turn) if turn.is_from_human() || !turn.is_final() => {
                skipped += 1;
            }
            InboundFrame::Turn(turn) => {
                debug!(
                    command = command.as_str(),
                    frames_skipped = skipped,
                    "turn finalized"
                );
                return Ok(*turn);
            }
            InboundFrame::Error(comment) => {
                return Err(Interrupted::Rejected(
                    Error::server(comment).with_context(context(command)),
                ));
            }
            InboundFrame::Chat(_) => {
                return Err(Interrupted::Desynced(
                    Error::server("unexpected chat frame while awaiting a turn")
                        .with_context(context(command)),
                ));
            }
            InboundFrame::Other(value) => {
                let name = value
                    .get("command")
                    .and_then(|c| c.as_str())
                    .unwrap_or("unknown")
                    .to_string();
                return Err(Interrupted::Desynced(
                    Error::server(format!("unexpected frame `{name}` while awaiting a turn"))
                        .with_context(context(command)),
                ));
            }
        }
    }
}

/// Read exactly one frame for an administrative command. Error frames become
/// [`Error::Server`] carrying their comment.
pub async fn await_single<T>(transport: &mut T, command: Command) -> Result<InboundFrame>
where
    T: FrameTransport + ?Sized,
{
    single(transport, command)
        .await
        .map_err(Interrupted::into_error)
}

pub(crate) async fn single<T>(
    transport: &mut T,
    command: Command,
) -> std::result::Result<InboundFrame, Interrupted>
where
    T: FrameTransport + ?Sized,
{
    let frame = transport.recv_frame().await.map_err(Interrupted::Desynced)?;
    match InboundFrame::classify(frame).map_err(Interrupted::Desynced)? {
        InboundFrame::Error(comment) => Err(Interrupted::Rejected(
            Error::server(comment).with_context(context(command)),
        )),
        other => {
            debug!(command = command.as_str(), "command acknowledged");
            Ok(other)
        }
    }
}

/// Error for a single-frame reply that lacks the key the command expects.
pub(crate) fn missing_key(command: Command, key: &str) -> Error {
    Error::server(format!("reply to {} has no `{key}`", command.as_str()))
        .with_context(context(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::frame::testing::ScriptedTransport;
    use crate::ErrorKind;
    use serde_json::{json, Value};

    fn turn_frame(author: &str, text: &str, is_final: Option<bool>) -> Value {
        let mut candidate = json!({"candidate_id": format!("cand-{text}"), "raw_content": text});
        if let Some(f) = is_final {
            candidate["is_final"] = json!(f);
        }
        json!({
            "command": "update_turn",
            "turn": {
                "turn_key": {"chat_id": "c1", "turn_id": format!("t-{author}")},
                "author": {"author_id": author, "name": author},
                "candidates": [candidate]
            }
        })
    }

    #[tokio::test]
    async fn skips_human_and_partial_frames() {
        let mut t = ScriptedTransport::new([
            turn_frame("12345", "hello", Some(true)),
            turn_frame("char-1", "h", None),
            turn_frame("char-1", "hi", Some(true)),
        ]);
        let turn = await_final_turn(&mut t, Command::CreateAndGenerateTurn)
            .await
            .unwrap();
        assert_eq!(turn.text(), "hi");
        assert_eq!(turn.author.author_id, "char-1");
        assert!(t.inbound.is_empty());
    }

    #[tokio::test]
    async fn explicit_non_final_is_skipped() {
        let mut t = ScriptedTransport::new([
            turn_frame("char-1", "par", Some(false)),
            turn_frame("char-1", "done", Some(true)),
        ]);
        let turn = await_final_turn(&mut t, Command::GenerateTurnCandidate)
            .await
            .unwrap();
        assert_eq!(turn.text(), "done");
    }

    #[tokio::test]
    async fn comment_frame_raises_immediately() {
        let mut t = ScriptedTransport::new([
            json!({"comment": "generation failed"}),
            turn_frame("char-1", "never", Some(true)),
        ]);
        let err = await_final_turn(&mut t, Command::CreateAndGenerateTurn)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.server_message(), Some("generation failed"));
        assert_eq!(t.inbound.len(), 1);
    }

    #[tokio::test]
    async fn closed_stream_surfaces_as_transport_error() {
        let mut t = ScriptedTransport::new([turn_frame("char-1", "h", None)]);
        let err = await_final_turn(&mut t, Command::CreateAndGenerateTurn)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn error_frame_rejects_while_stray_frames_desync() {
        let mut t = ScriptedTransport::new([json!({"comment": "busy"})]);
        let rejected = final_turn(&mut t, Command::CreateAndGenerateTurn).await;
        assert!(matches!(rejected, Err(Interrupted::Rejected(_))));

        let mut t = ScriptedTransport::new([
            json!({"command": "create_chat_response", "foo": 1}),
            turn_frame("char-1", "late", Some(true)),
        ]);
        let stray = final_turn(&mut t, Command::CreateAndGenerateTurn).await;
        assert!(matches!(stray, Err(Interrupted::Desynced(ref e)) if e.kind() == ErrorKind::Server));

        let mut t = ScriptedTransport::new([json!({"turn": {"author": {"author_id": 5}, "candidates": []}})]);
        let garbled = final_turn(&mut t, Command::CreateAndGenerateTurn).await;
        assert!(matches!(garbled, Err(Interrupted::Desynced(ref e)) if e.kind() == ErrorKind::MalformedResponse));
    }

    #[tokio::test]
    async fn single_frame_error_uses_comment() {
        let mut t = ScriptedTransport::new([json!({"command": "neo_error", "comment": "not yours"})]);
        let err = await_single(&mut t, Command::RemoveTurns).await.unwrap_err();
        assert_eq!(err.server_message(), Some("not yours"));
    }
}
