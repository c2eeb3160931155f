use crate::session::frame::FrameTransport;
use crate::transport::TransportError;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{COOKIE, USER_AGENT};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open chat WebSocket, authenticated by the token cookie at handshake time.
pub struct WsConnection {
    socket: Socket,
    recv_timeout: Option<Duration>,
    closed: bool,
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection")
            .field("recv_timeout", &self.recv_timeout)
            .field("closed", &self.closed)
            .finish()
    }
}

impl WsConnection {
    /// Open the socket. A handshake answered with 401/403 is an authentication failure.
    ///
    /// The connection is always direct; [`crate::ClientConfig::proxy`] applies to HTTP only.
    pub async fn connect(
        url: &str,
        token: &str,
        user_agent: &str,
        connect_timeout: Duration,
        recv_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut request = url
            .into_client_request()
            .map_err(|e| Error::configuration(format!("invalid WebSocket url {url}: {e}")))?;

        let cookie = HeaderValue::from_str(&format!("HTTP_AUTHORIZATION=\"Token {token}\""))
            .map_err(|_| Error::authentication("token contains characters not allowed in a header"))?;
        request.headers_mut().insert(COOKIE, cookie);
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            request.headers_mut().insert(USER_AGENT, ua);
        }

        debug!(endpoint = url, "opening chat socket");
        let connected = tokio::time::timeout(connect_timeout, connect_async(request))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "WebSocket connect did not finish within {}s",
                    connect_timeout.as_secs()
                ))
            })?;

        let (socket, _) = match connected {
            Ok(pair) => pair,
            Err(tungstenite::Error::Http(resp)) => {
                let status = resp.status().as_u16();
                warn!(http_status = status, endpoint = url, "chat socket handshake rejected");
                let ctx = ErrorContext::new()
                    .with_endpoint(url)
                    .with_status_code(status)
                    .with_source("ws");
                return Err(match status {
                    401 | 403 => Error::authentication("Wrong token").with_context(ctx),
                    429 | 503 => Error::overloaded("handshake rejected").with_context(ctx),
                    _ => Error::server(format!("handshake rejected with HTTP {status}"))
                        .with_context(ctx),
                });
            }
            Err(e) => return Err(TransportError::WebSocket(e).into()),
        };

        info!(endpoint = url, "chat socket connected");
        Ok(Self {
            socket,
            recv_timeout,
            closed: false,
        })
    }

    async fn next_message(&mut self) -> Result<Option<Message>> {
        let next = match self.recv_timeout {
            Some(limit) => tokio::time::timeout(limit, self.socket.next())
                .await
                .map_err(|_| {
                    Error::timeout(format!("no frame received within {}s", limit.as_secs()))
                })?,
            None => self.socket.next().await,
        };
        next.transpose()
            .map_err(|e| Error::from(TransportError::WebSocket(e)))
    }
}

#[async_trait]
impl FrameTransport for WsConnection {
    async fn send_frame(&mut self, frame: Value) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        let text = serde_json::to_string(&frame)?;
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::WebSocket(e).into())
    }

    async fn recv_frame(&mut self) -> Result<Value> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        loop {
            let payload = match self.next_message().await? {
                Some(Message::Text(text)) => text,
                Some(Message::Binary(data)) => String::from_utf8_lossy(&data).into_owned(),
                Some(Message::Ping(_)) | Some(Message::Pong(_)) | Some(Message::Frame(_)) => {
                    continue
                }
                Some(Message::Close(_)) | None => {
                    self.closed = true;
                    return Err(TransportError::Closed.into());
                }
            };
            return serde_json::from_str(&payload)
                .map_err(|e| Error::malformed(format!("undecodable frame: {e}"), payload));
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.socket.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::WebSocket(e).into()),
        }
    }
}
