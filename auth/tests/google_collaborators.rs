//! Google and `YouTube` clients against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use callback_relay_auth::{
    CallbackRelay, GoogleOAuthProvider, InMemorySessionStore, PayloadMode, RelayConfig,
    RelayEnvironment, RelayError, YouTubeClient, relay_router,
    providers::{OAuth2Provider, VideoMetadata, VideoPublisher},
};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn google(server: &MockServer) -> GoogleOAuthProvider {
    GoogleOAuthProvider::new(
        "client-id".to_string(),
        "client-secret".to_string(),
        "http://localhost:10000/auth/google/callback".to_string(),
    )
    .with_token_url(format!("{}/token", server.uri()))
    .with_userinfo_url(format!("{}/oauth2/v2/userinfo", server.uri()))
}

fn youtube(server: &MockServer) -> YouTubeClient {
    YouTubeClient::new().with_upload_url(format!(
        "{}/youtube/v3/videos?part=snippet,status",
        server.uri()
    ))
}

#[tokio::test]
async fn test_exchange_code_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T",
            "expires_in": 3599,
            "refresh_token": "R",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = google(&server).exchange_code("abc").await.unwrap();

    assert_eq!(tokens.access_token, "T");
    assert_eq!(tokens.refresh_token.as_deref(), Some("R"));
}

#[tokio::test]
async fn test_exchange_code_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = google(&server).exchange_code("stale").await;

    assert!(matches!(result, Err(RelayError::OAuthTokenExchangeFailed(_))));
}

#[tokio::test]
async fn test_exchange_code_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = google(&server).exchange_code("abc").await;

    assert!(matches!(result, Err(RelayError::OAuthTokenExchangeFailed(_))));
}

#[tokio::test]
async fn test_fetch_user_info_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "name": "A",
            "picture": "https://example.com/a.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = google(&server).fetch_user_info("T").await.unwrap();

    assert_eq!(profile.subject(), Some("1"));
    assert_eq!(profile.to_json()["picture"], "https://example.com/a.png");
}

#[tokio::test]
async fn test_fetch_user_info_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = google(&server).fetch_user_info("expired").await;

    assert!(matches!(result, Err(RelayError::OAuthUserInfoFailed(_))));
}

#[tokio::test]
async fn test_insert_video_sends_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("part", "snippet,status"))
        .and(header("authorization", "Bearer T"))
        .and(body_json(json!({
            "snippet": {
                "title": "Run 42",
                "description": "Speedrun",
                "tags": ["Unity", "Gameplay"],
                "categoryId": "20"
            },
            "status": {"privacyStatus": "unlisted"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "youtube#video",
            "id": "vid1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = VideoMetadata::new("Run 42", "Speedrun", "unlisted");
    let resource = youtube(&server).insert_video("T", &metadata).await.unwrap();

    assert_eq!(resource["id"], "vid1");
    assert_eq!(resource["kind"], "youtube#video");
}

#[tokio::test]
async fn test_insert_video_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let metadata = VideoMetadata::new("Run 42", "Speedrun", "unlisted");
    let result = youtube(&server).insert_video("T", &metadata).await;

    assert!(matches!(result, Err(RelayError::VideoUploadFailed(_))));
}

#[tokio::test]
async fn test_full_flow_against_mocked_google() {
    let google_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T"})))
        .expect(1)
        .mount(&google_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1", "name": "A"})))
        .expect(1)
        .mount(&google_server)
        .await;

    let env = RelayEnvironment::new(
        google(&google_server),
        youtube(&google_server),
        InMemorySessionStore::new(),
    );
    let relay =
        Arc::new(CallbackRelay::new(env, RelayConfig::new(PayloadMode::Profile), None).unwrap());
    let server = TestServer::new(relay_router(relay)).unwrap();

    let callback = server
        .get("/auth/google/callback")
        .add_query_param("code", "abc")
        .add_query_param("state", "xyz")
        .await;
    assert_eq!(callback.status_code(), StatusCode::OK);

    let first = server.get("/getProfile").add_query_param("state", "xyz").await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(first.json::<Value>(), json!({"id": "1", "name": "A"}));

    let second = server.get("/getProfile").add_query_param("state", "xyz").await;
    assert_eq!(second.status_code(), StatusCode::NOT_FOUND);
}
