//! Shared fixtures: a client pointed at local servers and a scripted chat socket.
#![allow(dead_code)]

use characterai::{Client, ClientBuilder, ClientConfig};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

pub const TOKEN: &str = "test-token";

/// Configuration with every host pointed at `rest`/`ws` and no environment influence.
pub fn config(rest: &str, ws: &str) -> ClientConfig {
    ClientConfig {
        token: Some(TOKEN.to_string()),
        rest_url: rest.to_string(),
        neo_url: rest.to_string(),
        ws_url: ws.to_string(),
        image_url: format!("{rest}/i/"),
        identifier: "chrome120".to_string(),
        http_timeout: Duration::from_secs(5),
        ws_connect_timeout: Duration::from_secs(5),
        ws_recv_timeout: Some(Duration::from_secs(5)),
        proxy: None,
    }
}

pub fn client(rest: &str) -> Client {
    ClientBuilder::from_config(config(rest, "ws://127.0.0.1:9/ws/"))
        .build()
        .unwrap()
}

pub fn ws_client(ws: &str) -> Client {
    ClientBuilder::from_config(config("http://127.0.0.1:9", ws))
        .build()
        .unwrap()
}

/// What the scripted server observed.
#[derive(Debug, Default)]
pub struct Observed {
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
    pub received: Vec<Value>,
    pub closed_by_client: bool,
}

/// A WebSocket server that answers every inbound text frame with the next scripted
/// batch of frames.
pub struct MockWsServer {
    pub addr: SocketAddr,
    pub observed: Arc<Mutex<Observed>>,
    shutdown: Arc<Notify>,
}

impl MockWsServer {
    pub async fn start(replies: Vec<Vec<Value>>) -> Self {
        Self::spawn(replies, None).await
    }

    /// A server that refuses the handshake with `status`.
    pub async fn rejecting(status: u16) -> Self {
        Self::spawn(Vec::new(), Some(status)).await
    }

    async fn spawn(replies: Vec<Vec<Value>>, reject: Option<u16>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let observed = Arc::new(Mutex::new(Observed::default()));

        let shutdown_clone = shutdown.clone();
        let observed_clone = observed.clone();
        tokio::spawn(async move {
            let mut replies: VecDeque<Vec<Value>> = replies.into();
            tokio::select! {
                result = listener.accept() => {
                    if let Ok((stream, _)) = result {
                        Self::handle_connection(stream, &mut replies, reject, observed_clone).await;
                    }
                }
                _ = shutdown_clone.notified() => {}
            }
        });

        Self {
            addr,
            observed,
            shutdown,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        replies: &mut VecDeque<Vec<Value>>,
        reject: Option<u16>,
        observed: Arc<Mutex<Observed>>,
    ) {
        let headers_sink = observed.clone();
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let header = |name: &str| {
                req.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            {
                let mut seen = headers_sink.lock().unwrap();
                seen.cookie = header("cookie");
                seen.user_agent = header("user-agent");
            }
            match reject {
                Some(status) => {
                    let mut refusal = ErrorResponse::new(Some("rejected".to_string()));
                    *refusal.status_mut() = StatusCode::from_u16(status).unwrap();
                    Err(refusal)
                }
                None => Ok(resp),
            }
        };

        let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
            return;
        };

        while let Some(Ok(msg)) = ws.next().await {
            match msg {
                Message::Text(text) => {
                    let frame: Value = serde_json::from_str(&text).unwrap();
                    observed.lock().unwrap().received.push(frame);
                    for reply in replies.pop_front().unwrap_or_default() {
                        if ws.send(Message::Text(reply.to_string())).await.is_err() {
                            return;
                        }
                    }
                }
                Message::Close(_) => {
                    observed.lock().unwrap().closed_by_client = true;
                    break;
                }
                _ => {}
            }
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/", self.addr)
    }

    pub fn received(&self) -> Vec<Value> {
        self.observed.lock().unwrap().received.clone()
    }

    /// Wait until the client has sent a close frame.
    pub async fn wait_closed(&self) -> bool {
        for _ in 0..50 {
            if self.observed.lock().unwrap().closed_by_client {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A turn frame as the service sends it.
pub fn turn_frame(author_id: &str, text: &str, is_final: Option<bool>) -> Value {
    let mut candidate = serde_json::json!({
        "candidate_id": format!("cand-{text}"),
        "raw_content": text,
    });
    if let Some(is_final) = is_final {
        candidate["is_final"] = Value::Bool(is_final);
    }
    serde_json::json!({
        "command": if is_final == Some(true) { "update_turn" } else { "add_turn" },
        "turn": {
            "turn_key": {"chat_id": "chat-1", "turn_id": format!("turn-{author_id}")},
            "author": {"author_id": author_id, "name": author_id},
            "candidates": [candidate],
            "primary_candidate_id": format!("cand-{text}"),
        }
    })
}
