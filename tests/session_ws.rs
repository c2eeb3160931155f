//! Turn-protocol sessions against a scripted local WebSocket server.

mod common;

use characterai::session::{NewChatOptions, NextMessage, SendMessage, SessionState};
use characterai::{ClientBuilder, ErrorKind};
use common::{turn_frame, MockWsServer};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn handshake_carries_the_token_cookie() {
    let server = MockWsServer::start(vec![]).await;
    let client = common::ws_client(&server.ws_url());

    let mut session = client.connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Connected);

    let observed = server.observed.lock().unwrap();
    assert_eq!(
        observed.cookie.as_deref(),
        Some("HTTP_AUTHORIZATION=\"Token test-token\"")
    );
    assert!(observed
        .user_agent
        .as_deref()
        .is_some_and(|ua| ua.contains("Chrome/120")));
    drop(observed);

    session.close().await.unwrap();
    assert_eq!(session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn http_proxy_does_not_apply_to_the_chat_socket() {
    let server = MockWsServer::start(vec![]).await;
    let mut config = common::config("http://127.0.0.1:9", &server.ws_url());
    config.proxy = Some("http://127.0.0.1:9".to_string());
    let client = ClientBuilder::from_config(config).build().unwrap();

    let mut session = client.connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Connected);
    session.close().await.unwrap();
}

#[tokio::test]
async fn rejected_handshake_is_authentication() {
    let server = MockWsServer::rejecting(403).await;
    let client = common::ws_client(&server.ws_url());

    let err = client.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.context().and_then(|c| c.status_code), Some(403));
}

#[tokio::test]
async fn send_message_returns_the_first_final_bot_turn() {
    let server = MockWsServer::start(vec![vec![
        turn_frame("12345", "hello", Some(true)),
        turn_frame("char-1", "h", None),
        turn_frame("char-1", "hi", Some(true)),
    ]])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let turn = session
        .send_message(SendMessage::new("char-1", "chat-1", "hello").author("12345", "me"))
        .await
        .unwrap();
    assert_eq!(turn.text(), "hi");
    assert!(turn.is_final());
    assert!(!turn.is_from_human());
    assert_eq!(turn.author.author_id, "char-1");

    let sent = server.received();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["command"], "create_and_generate_turn");
    assert_eq!(sent[0]["payload"]["character_id"], "char-1");
    assert_eq!(sent[0]["payload"]["turn"]["turn_key"]["chat_id"], "chat-1");
    assert_eq!(
        sent[0]["payload"]["turn"]["candidates"][0]["raw_content"],
        "hello"
    );
    assert!(sent[0].get("update_primary_candidate").is_none());

    session.close().await.unwrap();
    assert!(server.wait_closed().await);
}

#[tokio::test]
async fn update_primary_candidate_is_sent_top_level() {
    let server = MockWsServer::start(vec![vec![turn_frame("char-1", "ok", Some(true))]]).await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    session
        .send_message(
            SendMessage::new("char-1", "chat-1", "again")
                .turn_id("my-turn")
                .update_primary_candidate("prev-turn", "cand-2"),
        )
        .await
        .unwrap();

    let sent = server.received();
    assert_eq!(
        sent[0]["update_primary_candidate"],
        json!({
            "candidate_id": "cand-2",
            "turn_key": {"chat_id": "chat-1", "turn_id": "prev-turn"}
        })
    );
    assert_eq!(sent[0]["payload"]["turn"]["turn_key"]["turn_id"], "my-turn");
}

#[tokio::test]
async fn new_chat_reads_the_chat_then_the_greeting() {
    let server = MockWsServer::start(vec![vec![
        json!({
            "command": "create_chat_response",
            "chat": {"chat_id": "chat-7", "character_id": "char-1", "type": "TYPE_ONE_ON_ONE"}
        }),
        turn_frame("char-1", "Welcome!", Some(true)),
    ]])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let (chat, greeting) = session
        .new_chat("char-1", "42", NewChatOptions::default().chat_id("chat-7"))
        .await
        .unwrap();
    assert_eq!(chat.chat_id, "chat-7");
    assert_eq!(greeting.unwrap().text(), "Welcome!");

    let sent = server.received();
    assert_eq!(sent[0]["command"], "create_chat");
    assert_eq!(sent[0]["payload"]["chat"]["chat_id"], "chat-7");
    assert_eq!(sent[0]["payload"]["chat"]["creator_id"], "42");
    assert_eq!(sent[0]["payload"]["chat"]["type"], "TYPE_ONE_ON_ONE");
    assert_eq!(sent[0]["payload"]["with_greeting"], true);
}

#[tokio::test]
async fn new_chat_without_greeting_reads_one_frame() {
    let server = MockWsServer::start(vec![
        vec![json!({"command": "create_chat_response", "chat": {"chat_id": "chat-8"}})],
        vec![turn_frame("char-1", "reply", Some(true))],
    ])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let (chat, greeting) = session
        .new_chat("char-1", "42", NewChatOptions::default().without_greeting())
        .await
        .unwrap();
    assert_eq!(chat.chat_id, "chat-8");
    assert!(greeting.is_none());

    // The next reply belongs to the next command.
    let turn = session
        .send_message(SendMessage::new("char-1", "chat-8", "hey"))
        .await
        .unwrap();
    assert_eq!(turn.text(), "reply");
}

#[tokio::test]
async fn next_message_sends_language_and_tts() {
    let server = MockWsServer::start(vec![vec![turn_frame("char-1", "alt", Some(true))]]).await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let turn = session
        .next_message("char-1", "chat-1", "turn-9", NextMessage::default())
        .await
        .unwrap();
    assert_eq!(turn.text(), "alt");

    let payload = &server.received()[0]["payload"];
    assert_eq!(payload["selected_language"], "English");
    assert_eq!(payload["tts_enabled"], false);
    assert_eq!(payload["turn_key"]["turn_id"], "turn-9");
}

#[tokio::test]
async fn neo_error_surfaces_its_comment() {
    let server = MockWsServer::start(vec![vec![json!({
        "command": "neo_error",
        "comment": "You cannot edit this turn"
    })]])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let err = session
        .edit_message("chat-1", "turn-1", "changed")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.server_message(), Some("You cannot edit this turn"));
    assert_eq!(session.state(), SessionState::Connected);
}

#[tokio::test]
async fn undecodable_frame_mid_turn_never_leaks_into_the_next_reply() {
    let server = MockWsServer::start(vec![
        vec![
            json!({"turn": {"author": {"author_id": 5}, "candidates": []}}),
            turn_frame("char-1", "stale answer to first message", Some(true)),
        ],
        vec![turn_frame("char-1", "fresh answer to second message", Some(true))],
    ])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let err = session
        .send_message(SendMessage::new("char-1", "chat-1", "first"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert_eq!(session.state(), SessionState::Disconnected);

    let err = session
        .send_message(SendMessage::new("char-1", "chat-1", "second"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(server.received().len(), 1);
}

#[tokio::test]
async fn unexpected_frame_mid_turn_disconnects() {
    let server = MockWsServer::start(vec![vec![
        turn_frame("char-1", "par", None),
        json!({"command": "create_chat_response", "request_id": "r0"}),
        turn_frame("char-1", "stale", Some(true)),
    ]])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let err = session
        .next_message("char-1", "chat-1", "turn-1", NextMessage::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(session.state(), SessionState::Disconnected);

    let err = session
        .edit_message("chat-1", "turn-1", "changed")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn error_frame_leaves_the_socket_ready_for_the_next_command() {
    let server = MockWsServer::start(vec![
        vec![json!({"command": "neo_error", "comment": "generation failed"})],
        vec![
            turn_frame("12345", "second", Some(true)),
            turn_frame("char-1", "fresh answer to second message", Some(true)),
        ],
    ])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    let err = session
        .send_message(SendMessage::new("char-1", "chat-1", "first"))
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("generation failed"));
    assert_eq!(session.state(), SessionState::Connected);

    let turn = session
        .send_message(SendMessage::new("char-1", "chat-1", "second"))
        .await
        .unwrap();
    assert_eq!(turn.text(), "fresh answer to second message");
    session.close().await.unwrap();
}

#[tokio::test]
async fn delete_messages_acknowledged() {
    let server = MockWsServer::start(vec![vec![json!({
        "command": "remove_turns_response",
        "request_id": "r1"
    })]])
    .await;
    let client = common::ws_client(&server.ws_url());
    let mut session = client.connect().await.unwrap();

    session
        .delete_messages("chat-1", &["t1", "t2"])
        .await
        .unwrap();
    let payload = &server.received()[0]["payload"];
    assert_eq!(payload["turn_ids"], json!(["t1", "t2"]));

    let err = session
        .delete_messages::<&str>("chat-1", &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn receive_timeout_disconnects_the_session() {
    let server = MockWsServer::start(vec![vec![turn_frame("char-1", "par", None)]]).await;
    let mut config = common::config("http://127.0.0.1:9", &server.ws_url());
    config.ws_recv_timeout = Some(Duration::from_millis(200));
    let client = ClientBuilder::from_config(config).build().unwrap();
    let mut session = client.connect().await.unwrap();

    let err = session
        .send_message(SendMessage::new("char-1", "chat-1", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(session.state(), SessionState::Disconnected);

    let err = session
        .send_message(SendMessage::new("char-1", "chat-1", "again"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn with_session_always_closes() {
    let server = MockWsServer::start(vec![vec![json!({"comment": "rate limited"})]]).await;
    let client = common::ws_client(&server.ws_url());

    let result = client
        .with_session(|session| {
            Box::pin(async move {
                session
                    .send_message(SendMessage::new("char-1", "chat-1", "hello"))
                    .await
            })
        })
        .await;
    let err = result.unwrap_err();
    assert_eq!(err.server_message(), Some("rate limited"));
    assert!(server.wait_closed().await);
}
