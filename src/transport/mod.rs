//! 传输层：HTTP（REST / neo 两个主机）与聊天 WebSocket。
//!
//! # Transport Module
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`http`] | Authenticated REST calls against the REST and neo hosts |
//! | [`envelope`] | One-shot classification of response bodies into success or a known error shape |
//! | [`stream`] | Helpers for newline-delimited streamed bodies |
//! | [`ws`] | The persistent chat WebSocket used by [`crate::session`] |

pub mod envelope;
pub mod http;
pub mod stream;
pub mod ws;

pub use envelope::Envelope;
pub use http::{ApiRequest, Host, HttpTransport, Verb};
pub use ws::WsConnection;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Connection closed")]
    Closed,

    #[error("Transport error: {0}")]
    Other(String),
}
