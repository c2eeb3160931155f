//! # characterai
//!
//! 非官方的 Character.AI 异步客户端：REST 接口、WebSocket 轮次协议与类型化响应。
//!
//! Unofficial async client for Character.AI: the REST surface on the main and neo hosts,
//! the WebSocket turn protocol, and typed records for every response.
//!
//! ## Overview
//!
//! - **Services**: [`Client`] hands out one service per area of the REST surface
//!   (`client.characters()`, `client.chat1()`, ...). Every service can run a call under
//!   another account with `.with_token(..)`.
//! - **Chat sessions**: [`Client::connect`] opens a [`session::ChatSession`] that sends
//!   turn-protocol commands over one socket and waits for the character's finalized
//!   reply. [`Client::with_session`] closes the socket for you.
//! - **Typed errors**: every response body is classified once; callers see either a
//!   decoded record or an [`Error`] whose [`ErrorKind`] tells what went wrong.
//! - **Blocking mode**: [`blocking::Client`] drives the same API from synchronous code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use characterai::session::{NewChatOptions, SendMessage};
//! use characterai::Client;
//!
//! #[tokio::main]
//! async fn main() -> characterai::Result<()> {
//!     let client = Client::new("your-token")?;
//!     let me = client.account().me().await?;
//!     let creator = me.id().map(|id| id.to_string()).unwrap_or_default();
//!
//!     let mut session = client.connect().await?;
//!     let (chat, _greeting) = session
//!         .new_chat("CHAR_ID", &creator, NewChatOptions::default())
//!         .await?;
//!     let reply = session
//!         .send_message(SendMessage::new("CHAR_ID", chat.chat_id.as_str(), "Hello!"))
//!         .await?;
//!     println!("{}: {}", reply.name(), reply.text());
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client entry point and builder |
//! | [`config`] | Hosts, timeouts and environment defaults |
//! | [`services`] | REST services grouped by area |
//! | [`session`] | WebSocket turn-protocol sessions |
//! | [`transport`] | HTTP and WebSocket plumbing, response classification |
//! | [`types`] | Typed response records |
//! | [`auth`] | Email sign-in and guest tokens |
//! | [`blocking`] | Synchronous facade |

pub mod auth;
pub mod blocking;
pub mod client;
pub mod config;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use session::{ChatSession, FrameTransport};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
