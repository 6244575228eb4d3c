//! Session behaviour against a local mock of the OAuth and completion endpoints

use gigacheck_client::{AuthError, ClientError, Credential, Session};
use gigacheck_config::{Config, ConfigError, Secret};
use gigacheck_core::{ChatCompletionRequest, Message};
use mockito::Matcher;

const COMPLETION: &str = r#"{
    "id": "1",
    "object": "chat.completion",
    "created": 1706000000,
    "model": "GigaChat",
    "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}],
    "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
}"#;

fn config_for(server: &mockito::Server) -> Config {
    let mut config = Config::default();
    config.auth.basic_auth_token = Some(Secret::new("c2VjcmV0"));
    config.auth.oauth_url = format!("{}/api/v2/oauth", server.url());
    config.api.base_url = format!("{}/api/v1", server.url());
    config
}

fn hello() -> ChatCompletionRequest {
    ChatCompletionRequest::new("GigaChat").with_message(Message::user("Привет!"))
}

#[tokio::test]
async fn token_request_has_expected_shape() {
    let mut server = mockito::Server::new_async().await;
    let oauth = server
        .mock("POST", "/api/v2/oauth")
        .match_header("authorization", "Basic c2VjcmV0")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("accept", "application/json")
        .match_header("rquid", Matcher::Regex(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-".to_string()))
        .match_body(Matcher::UrlEncoded("scope".to_string(), "GIGACHAT_API_PERS".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "tok-1", "expires_at": 1706000000000}"#)
        .expect(1)
        .create_async()
        .await;

    let session = Session::new(config_for(&server)).unwrap();
    let credential = session.credential().await.unwrap();

    assert_eq!(credential.token(), "tok-1");
    assert_eq!(credential.expires_at(), Some(1706000000000));
    oauth.assert_async().await;
}

#[tokio::test]
async fn token_is_acquired_once_per_session() {
    let mut server = mockito::Server::new_async().await;
    let oauth = server
        .mock("POST", "/api/v2/oauth")
        .with_status(200)
        .with_body(r#"{"access_token": "tok-1"}"#)
        .expect(1)
        .create_async()
        .await;
    let completions = server
        .mock("POST", "/api/v1/chat/completions")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(COMPLETION)
        .expect(3)
        .create_async()
        .await;

    let session = Session::new(config_for(&server)).unwrap();
    assert!(!session.is_authenticated());

    let mut request_ids = Vec::new();
    for _ in 0..3 {
        let response = session.post_chat_completions(&hello()).await.unwrap();
        assert_eq!(response.status(), 200);
        request_ids.push(response.request_id());
    }

    request_ids.sort();
    request_ids.dedup();
    assert_eq!(request_ids.len(), 3);
    assert!(session.is_authenticated());

    oauth.assert_async().await;
    completions.assert_async().await;
}

#[tokio::test]
async fn completion_request_carries_json_and_correlation_headers() {
    let mut server = mockito::Server::new_async().await;
    let uuid = Matcher::Regex(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$".to_string());
    let completions = server
        .mock("POST", "/api/v1/chat/completions")
        .match_header("authorization", "Bearer preset")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_header("x-request-id", uuid.clone())
        .match_header("x-session-id", uuid)
        .match_body(Matcher::PartialJsonString(
            r#"{"model": "GigaChat", "messages": [{"role": "user", "content": "Привет!"}], "temperature": 0.7}"#.to_string(),
        ))
        .with_status(200)
        .with_body(COMPLETION)
        .create_async()
        .await;

    let session = Session::with_credential(
        config_for(&server),
        reqwest::Client::new(),
        Credential::new("preset", None),
    );
    let response = session
        .post_chat_completions(&hello().temperature(0.7))
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.completion().unwrap().text(), "Hi");
    completions.assert_async().await;
}

#[tokio::test]
async fn client_error_status_is_returned_not_raised() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(422)
        .with_body(r#"{"status": 422, "message": "empty content"}"#)
        .create_async()
        .await;

    let session = Session::with_credential(
        config_for(&server),
        reqwest::Client::new(),
        Credential::new("preset", None),
    );
    let response = session.post_chat_completions(&hello()).await.unwrap();

    assert_eq!(response.status(), 422);
    assert!(response.body().contains("empty content"));
}

#[tokio::test]
async fn oauth_failure_status_is_an_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v2/oauth")
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let session = Session::new(config_for(&server)).unwrap();
    let err = session.credential().await.unwrap_err();

    match err {
        AuthError::Http { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn token_response_without_access_token_is_a_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v2/oauth")
        .with_status(200)
        .with_body(r#"{"tok": "wrong-field"}"#)
        .create_async()
        .await;

    let session = Session::new(config_for(&server)).unwrap();
    let err = session.credential().await.unwrap_err();

    assert!(matches!(err, AuthError::Protocol(ref msg) if msg.contains("access_token")));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn missing_secret_fails_before_any_request() {
    let mut server = mockito::Server::new_async().await;
    let oauth = server
        .mock("POST", "/api/v2/oauth")
        .expect(0)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.auth.basic_auth_token = None;

    let session = Session::new(config).unwrap();
    let err = session.post_chat_completions(&hello()).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Auth(AuthError::Config(ConfigError::MissingSecret(_)))
    ));
    oauth.assert_async().await;
}
