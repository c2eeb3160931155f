//! 会话模块：基于 WebSocket 的回合制聊天协议客户端。
//!
//! # Session Module
//!
//! One [`ChatSession`] owns one chat socket. Commands are sent one at a time (every
//! command method takes `&mut self`) and each waits for the frame that completes it:
//!
//! | Command | Completes on |
//! |---------|--------------|
//! | `create_chat` | a `chat` frame, then (with greeting) the first final character turn |
//! | `create_and_generate_turn` | the first final character turn |
//! | `generate_turn_candidate` | the first final character turn |
//! | `edit_turn_candidate` | one `turn` frame |
//! | `remove_turns` | one non-error frame |
//!
//! An error frame fails only the command it answers. Anything else that stops a command
//! partway (a dropped socket, a receive timeout, an undecodable or unexpected frame)
//! leaves the rest of that command's frames unaccounted for, so the socket is dropped
//! and the session moves to [`SessionState::Disconnected`]. There is no reconnect.

pub mod command;
pub mod frame;
pub mod receive;

use crate::transport::WsConnection;
use crate::types::chat2::{ChatData, ChatType, ChatVisibility, Turn, TurnKey};
use crate::{Error, ErrorKind, Result};
use command::{
    ChatSpec, Command, CommandFrame, CreateAndGenerateTurn, CreateChat, EditTurnCandidate,
    GenerateTurnCandidate, OutgoingAuthor, OutgoingCandidate, OutgoingTurn, PrimaryCandidate,
    RemoveTurns,
};
use frame::InboundFrame;
use receive::Interrupted;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use frame::FrameTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Everything needed to open the chat socket.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub url: String,
    pub token: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub recv_timeout: Option<Duration>,
}

/// Options of [`ChatSession::new_chat`].
#[derive(Debug, Clone)]
pub struct NewChatOptions {
    pub with_greeting: bool,
    /// Caller-chosen chat id; a random UUID otherwise.
    pub chat_id: Option<String>,
}

impl Default for NewChatOptions {
    fn default() -> Self {
        Self {
            with_greeting: true,
            chat_id: None,
        }
    }
}

impl NewChatOptions {
    pub fn without_greeting(mut self) -> Self {
        self.with_greeting = false;
        self
    }

    pub fn chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }
}

/// A message to send with [`ChatSession::send_message`].
#[derive(Debug, Clone)]
pub struct SendMessage {
    character_id: String,
    chat_id: String,
    text: String,
    turn_id: Option<String>,
    author: OutgoingAuthor,
    image: Option<String>,
    primary: Option<PrimaryCandidate>,
}

impl SendMessage {
    pub fn new(
        character_id: impl Into<String>,
        chat_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            character_id: character_id.into(),
            chat_id: chat_id.into(),
            text: text.into(),
            turn_id: None,
            author: OutgoingAuthor::default(),
            image: None,
            primary: None,
        }
    }

    /// Caller-chosen id for the new turn.
    pub fn turn_id(mut self, turn_id: impl Into<String>) -> Self {
        self.turn_id = Some(turn_id.into());
        self
    }

    pub fn author(mut self, author_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.author = OutgoingAuthor {
            author_id: Some(author_id.into()),
            name: Some(name.into()),
            is_human: Some(true),
        };
        self
    }

    /// Attach an uploaded image by its server-side relative path.
    pub fn image(mut self, rel_path: impl Into<String>) -> Self {
        self.image = Some(rel_path.into());
        self
    }

    /// Make `candidate_id` the primary candidate of the earlier turn `turn_id` before
    /// generating the reply (keeps an alternate answer chosen with `next_message`).
    pub fn update_primary_candidate(
        mut self,
        turn_id: impl Into<String>,
        candidate_id: impl Into<String>,
    ) -> Self {
        self.primary = Some(PrimaryCandidate {
            candidate_id: candidate_id.into(),
            turn_key: TurnKey::new(self.chat_id.clone(), turn_id),
        });
        self
    }
}

/// Options of [`ChatSession::next_message`].
#[derive(Debug, Clone)]
pub struct NextMessage {
    pub tts: bool,
    pub language: String,
}

impl Default for NextMessage {
    fn default() -> Self {
        Self {
            tts: false,
            language: "English".to_string(),
        }
    }
}

impl NextMessage {
    pub fn tts(mut self, enabled: bool) -> Self {
        self.tts = enabled;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// A turn-protocol chat session over one socket.
pub struct ChatSession<T: FrameTransport = WsConnection> {
    transport: Option<T>,
    state: SessionState,
    params: Option<ConnectParams>,
}

impl<T: FrameTransport> std::fmt::Debug for ChatSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("state", &self.state)
            .finish()
    }
}

impl ChatSession<WsConnection> {
    /// A session that has not opened its socket yet.
    pub fn new(params: ConnectParams) -> Self {
        Self {
            transport: None,
            state: SessionState::Disconnected,
            params: Some(params),
        }
    }

    /// Open the socket. A no-op when already connected.
    pub async fn open(&mut self) -> Result<()> {
        if self.state == SessionState::Connected {
            return Ok(());
        }
        let params = self
            .params
            .clone()
            .ok_or_else(|| Error::configuration("session has no connection parameters"))?;

        self.state = SessionState::Connecting;
        let connected = WsConnection::connect(
            &params.url,
            &params.token,
            &params.user_agent,
            params.connect_timeout,
            params.recv_timeout,
        )
        .await;

        match connected {
            Ok(conn) => {
                self.transport = Some(conn);
                self.state = SessionState::Connected;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Disconnected;
                Err(e)
            }
        }
    }
}

impl<T: FrameTransport> ChatSession<T> {
    /// Wrap an already-open transport.
    pub fn from_transport(transport: T) -> Self {
        Self {
            transport: Some(transport),
            state: SessionState::Connected,
            params: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Borrow the underlying transport, if still open.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    fn connected(&mut self) -> Result<&mut T> {
        self.transport
            .as_mut()
            .ok_or_else(|| crate::transport::TransportError::Closed.into())
    }

    /// Drop the socket after a transport failure so later calls fail fast.
    fn observe<R>(&mut self, result: Result<R>) -> Result<R> {
        if let Err(e) = &result {
            if matches!(e.kind(), ErrorKind::Transport | ErrorKind::Timeout) {
                warn!(error = %e, "chat socket lost");
                self.transport = None;
                self.state = SessionState::Disconnected;
            }
        }
        result
    }

    /// Keep the socket after an error frame; drop it when a command stopped partway.
    fn settle<R>(&mut self, result: std::result::Result<R, Interrupted>) -> Result<R> {
        match result {
            Ok(value) => Ok(value),
            Err(Interrupted::Rejected(e)) => Err(e),
            Err(Interrupted::Desynced(e)) => Err(self.desync(e)),
        }
    }

    fn desync(&mut self, error: Error) -> Error {
        warn!(error = %error, "chat socket out of step with the command, dropping it");
        self.transport = None;
        self.state = SessionState::Disconnected;
        error
    }

    async fn send<P: serde::Serialize>(&mut self, frame: CommandFrame<P>) -> Result<()> {
        let command = frame.command;
        let value = frame.to_value()?;
        debug!(command = command.as_str(), "sending command");
        let sent = self.connected()?.send_frame(value).await;
        self.observe(sent)
    }

    /// Create a chat with a character. Returns the chat and, unless disabled, the
    /// character's greeting turn.
    pub async fn new_chat(
        &mut self,
        character_id: &str,
        creator_id: &str,
        options: NewChatOptions,
    ) -> Result<(ChatData, Option<Turn>)> {
        let chat_id = options
            .chat_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        self.send(CommandFrame::new(
            Command::CreateChat,
            CreateChat {
                chat: ChatSpec {
                    chat_id,
                    creator_id: creator_id.to_string(),
                    visibility: ChatVisibility::Private,
                    character_id: character_id.to_string(),
                    chat_type: ChatType::OneOnOne,
                },
                with_greeting: options.with_greeting,
            },
        ))
        .await?;

        let reply = receive::single(self.connected()?, Command::CreateChat).await;
        let chat = match self.settle(reply)? {
            InboundFrame::Chat(chat) => *chat,
            _ => return Err(self.desync(receive::missing_key(Command::CreateChat, "chat"))),
        };
        info!(chat_id = chat.chat_id.as_str(), "chat created");

        if !options.with_greeting {
            return Ok((chat, None));
        }
        let greeting = receive::final_turn(self.connected()?, Command::CreateChat).await;
        let greeting = self.settle(greeting)?;
        Ok((chat, Some(greeting)))
    }

    /// Send a message and wait for the character's final reply.
    pub async fn send_message(&mut self, message: SendMessage) -> Result<Turn> {
        let frame = CommandFrame::new(
            Command::CreateAndGenerateTurn,
            CreateAndGenerateTurn {
                character_id: message.character_id,
                turn: OutgoingTurn {
                    turn_key: TurnKey {
                        chat_id: message.chat_id,
                        turn_id: message.turn_id,
                    },
                    author: message.author,
                    candidates: vec![OutgoingCandidate {
                        raw_content: message.text,
                        tti_image_rel_path: message.image,
                    }],
                },
            },
        )
        .with_primary(message.primary);

        self.send(frame).await?;
        let reply = receive::final_turn(self.connected()?, Command::CreateAndGenerateTurn).await;
        self.settle(reply)
    }

    /// Generate an alternate candidate for the character turn `turn_id`.
    pub async fn next_message(
        &mut self,
        character_id: &str,
        chat_id: &str,
        turn_id: &str,
        options: NextMessage,
    ) -> Result<Turn> {
        self.send(CommandFrame::new(
            Command::GenerateTurnCandidate,
            GenerateTurnCandidate {
                tts_enabled: options.tts,
                selected_language: options.language,
                character_id: character_id.to_string(),
                turn_key: TurnKey::new(chat_id, turn_id),
            },
        ))
        .await?;
        let reply = receive::final_turn(self.connected()?, Command::GenerateTurnCandidate).await;
        self.settle(reply)
    }

    /// Replace the text of a turn's candidate.
    pub async fn edit_message(&mut self, chat_id: &str, turn_id: &str, text: &str) -> Result<Turn> {
        self.send(CommandFrame::new(
            Command::EditTurnCandidate,
            EditTurnCandidate {
                turn_key: TurnKey::new(chat_id, turn_id),
                new_candidate_raw_content: text.to_string(),
            },
        ))
        .await?;
        let reply = receive::single(self.connected()?, Command::EditTurnCandidate).await;
        match self.settle(reply)? {
            InboundFrame::Turn(turn) => Ok(*turn),
            _ => Err(self.desync(receive::missing_key(Command::EditTurnCandidate, "turn"))),
        }
    }

    /// Remove turns from a chat.
    pub async fn delete_messages<S: AsRef<str>>(&mut self, chat_id: &str, turn_ids: &[S]) -> Result<()> {
        if turn_ids.is_empty() {
            return Err(Error::invalid_argument("no turn ids to delete"));
        }
        self.send(CommandFrame::new(
            Command::RemoveTurns,
            RemoveTurns {
                chat_id: chat_id.to_string(),
                turn_ids: turn_ids.iter().map(|t| t.as_ref().to_string()).collect(),
            },
        ))
        .await?;
        let reply = receive::single(self.connected()?, Command::RemoveTurns).await;
        self.settle(reply).map(|_| ())
    }

    /// Close the socket. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        let Some(mut transport) = self.transport.take() else {
            self.state = SessionState::Disconnected;
            return Ok(());
        };
        self.state = SessionState::Disconnected;
        let closed = transport.close().await;
        debug!("chat socket closed");
        closed
    }
}
