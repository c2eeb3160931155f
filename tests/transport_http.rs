//! Error classification of REST responses against a local mock server.

mod common;

use characterai::transport::ApiRequest;
use characterai::ErrorKind;
use mockito::Server;

#[tokio::test]
async fn token_header_and_success_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/chat/user/")
        .match_header("authorization", "Token test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"user": {"user": {"username": "ANONYMOUS"}}}"#)
        .create_async()
        .await;

    let client = common::client(&server.url());
    let value = client
        .transport()
        .request(ApiRequest::get("chat/user/"))
        .await
        .unwrap();
    assert_eq!(value["user"]["user"]["username"], "ANONYMOUS");
    mock.assert_async().await;
}

#[tokio::test]
async fn per_call_token_override() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/chat/user/")
        .match_header("authorization", "Token other")
        .with_status(200)
        .with_body(r#"{"user": {"user": {"username": "Guest123"}}}"#)
        .create_async()
        .await;

    let client = common::client(&server.url());
    let me = client.account().with_token("other").me().await.unwrap();
    assert_eq!(me.username(), "Guest123");
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_status_is_authentication() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/chat/user/")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid token."}"#)
        .create_async()
        .await;

    let client = common::client(&server.url());
    let err = client.account().me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.server_message(), Some("Invalid token."));
    assert_eq!(err.context().and_then(|c| c.status_code), Some(401));
}

#[tokio::test]
async fn detail_and_force_login_on_200_are_authentication() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/chat/user/")
        .with_status(200)
        .with_body(r#"{"detail": "Authentication credentials were not provided."}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/chat/characters/recent/")
        .with_status(200)
        .with_body(r#"{"force_login": true}"#)
        .create_async()
        .await;

    let client = common::client(&server.url());
    assert_eq!(
        client.account().me().await.unwrap_err().kind(),
        ErrorKind::Authentication
    );
    assert_eq!(
        client.recent().characters().await.unwrap_err().kind(),
        ErrorKind::Authentication
    );
}

#[tokio::test]
async fn error_and_status_shapes_are_server_rejections() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/chat/character/voices/")
        .with_status(200)
        .with_body(r#"{"error": "voice service unavailable"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/chat/topics/")
        .with_status(200)
        .with_body(r#"{"status": "Error: no topics"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/chats/recent/")
        .with_status(200)
        .with_body(r#"{"command": "neo_error", "comment": "bad request"}"#)
        .create_async()
        .await;

    let client = common::client(&server.url());

    let err = client.characters().voices().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.server_message(), Some("voice service unavailable"));

    let err = client.posts().topics().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);

    let err = client.recent().chats().await.unwrap_err();
    assert_eq!(err.server_message(), Some("bad request"));
}

#[tokio::test]
async fn waiting_room_page_is_overload() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/chat/user/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><title>Waiting Room</title></html>")
        .create_async()
        .await;
    server
        .mock("GET", "/chat/topics/")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let client = common::client(&server.url());
    assert_eq!(
        client.account().me().await.unwrap_err().kind(),
        ErrorKind::Overloaded
    );
    assert_eq!(
        client.posts().topics().await.unwrap_err().kind(),
        ErrorKind::Overloaded
    );
}

#[tokio::test]
async fn empty_or_garbled_bodies_are_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/chat/user/")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;
    server
        .mock("GET", "/chat/topics/")
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let client = common::client(&server.url());
    let err = client.account().me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);

    let err = client.posts().topics().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    match err {
        characterai::Error::MalformedResponse { body, .. } => assert_eq!(body, "{not json"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn not_found_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/character/info/")
        .with_status(404)
        .with_body("")
        .create_async()
        .await;

    let client = common::client(&server.url());
    let err = client.characters().get("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/chat/user/").expect(0).create_async().await;

    let mut config = common::config(&server.url(), "ws://127.0.0.1:9/ws/");
    config.token = None;
    let client = characterai::Client::from_config(config).unwrap();

    let err = client.account().me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    mock.assert_async().await;
}
