//! Token acquisition flows against a mock identity provider and REST host.

use characterai::auth::AuthFlow;
use characterai::ErrorKind;
use mockito::{Matcher, Server};
use serde_json::json;

fn flow(server: &mockito::ServerGuard) -> AuthFlow {
    AuthFlow::new()
        .unwrap()
        .identity_url(format!("{}/v1/", server.url()))
        .identity_key("test-key")
        .rest_url(server.url())
}

#[tokio::test]
async fn guest_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/auth/lazy/")
        .match_body(Matcher::Regex(r#""lazy_uuid":"[0-9a-f-]{36}""#.into()))
        .with_status(200)
        .with_body(r#"{"success": true, "token": "guest-token"}"#)
        .create_async()
        .await;

    let token = flow(&server).auth_guest().await.unwrap();
    assert_eq!(token, "guest-token");
    mock.assert_async().await;
}

#[tokio::test]
async fn send_code_checks_the_echoed_email() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/accounts:sendOobCode")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::PartialJson(json!({"requestType": "EMAIL_SIGNIN", "email": "a@b.c"})))
        .with_status(200)
        .with_body(r#"{"kind": "identitytoolkit#GetOobConfirmationCodeResponse", "email": "a@b.c"}"#)
        .create_async()
        .await;
    flow(&server).send_code("a@b.c").await.unwrap();

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/accounts:sendOobCode")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error": {"code": 400, "message": "INVALID_EMAIL"}}"#)
        .create_async()
        .await;
    let err = flow(&server).send_code("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.server_message(), Some("INVALID_EMAIL"));
}

#[tokio::test]
async fn magic_link_exchange() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/link")
        .with_status(302)
        .with_header("location", &format!("{}/landing?mode=signIn&oobCode=CODE123&lang=en", server.url()))
        .create_async()
        .await;
    server
        .mock("GET", "/landing")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;
    let sign_in = server
        .mock("POST", "/v1/accounts:signInWithEmailLink")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({"email": "a@b.c", "oobCode": "CODE123"})))
        .with_status(200)
        .with_body(r#"{"idToken": "id-token"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/dj-rest-auth/google_idp/")
        .match_body(Matcher::Json(json!({"id_token": "id-token"})))
        .with_status(200)
        .with_body(r#"{"key": "account-token"}"#)
        .create_async()
        .await;

    let link = format!("{}/link", server.url());
    let token = flow(&server).auth_user(&link, "a@b.c").await.unwrap();
    assert_eq!(token, "account-token");
    sign_in.assert_async().await;
}

#[tokio::test]
async fn expired_link_is_authentication() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/link")
        .with_status(200)
        .with_body("expired")
        .create_async()
        .await;

    let link = format!("{}/link", server.url());
    let err = flow(&server).auth_user(&link, "a@b.c").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
}
