//! Mock backend tests for the lanyard client.
//!
//! These tests use wiremock to simulate the admin API and exercise the
//! authenticated request pipeline without network access: the single-flight
//! refresh guarantee, retry behavior, and session lifecycle.

use std::time::Duration;

use lanyard::{AccessToken, ApiClient, ApiRequest, BaseUrl, ClientConfig, Credentials, Error};
use lanyard_contract::FindQuery;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a client pointed at a mock server.
fn mock_client(server: &MockServer) -> ApiClient {
    let base = BaseUrl::new(server.uri()).unwrap();
    ApiClient::new(&ClientConfig::new(base)).unwrap()
}

fn user_body() -> serde_json::Value {
    json!({
        "id": "65a1b2c3d4e5f6a7b8c9d0e1",
        "role": "admin",
        "username": "alice",
        "name": "Alice"
    })
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_success_seeds_token_and_user_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/local"))
        .and(body_json(json!({
            "username": "alice",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "T0"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .and(header("authorization", "Bearer T0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let user = client
        .login(&Credentials::new("alice", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(client.token_store().get().await.as_str(), "T0");
    assert_eq!(client.current_user().await.unwrap().username, "alice");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/local"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let result = client.login(&Credentials::new("bad", "wrongpass")).await;

    assert!(matches!(
        result,
        Err(Error::Auth(lanyard::error::AuthError::InvalidCredentials))
    ));
    assert!(client.token_store().get().await.is_empty());
}

// ============================================================================
// Request Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_non_401_response_passes_through_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    // A 403 must not engage the refresh protocol
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "T1" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let response = client
        .send(ApiRequest::get("/api/v1/accounts"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(client.token_store().get().await.as_str(), "T0");
}

#[tokio::test]
async fn test_caller_authorization_header_is_overwritten() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .and(header("authorization", "Bearer T0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let request = ApiRequest::get("/api/v1/user/self")
        .header("authorization", "Bearer forged")
        .unwrap();
    let response = client.send(request).await.unwrap();
    assert!(response.is_success());
}

/// Requests A and B both fire with expired token "T0"; both receive 401.
/// Exactly one refresh call happens, and both retries carry "Bearer T1".
#[tokio::test]
async fn test_concurrent_401s_trigger_single_refresh() {
    let server = MockServer::start().await;

    // Expired token: always rejected
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts"))
        .and(header("authorization", "Bearer T0"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Fresh token: accepted
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skip": 0, "limit": 10, "total": 0, "data": []
        })))
        .mount(&server)
        .await;

    // The delay holds the gate long enough for every concurrent 401 to pile
    // up behind the leader
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "T1" }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            client.send(ApiRequest::get("/api/v1/accounts")).await
        }));
    }

    for task in tasks {
        let response = task.await.unwrap().unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    assert_eq!(client.token_store().get().await.as_str(), "T1");
    // The refresh mock's expect(1) is verified when the server drops
}

/// A request that is 401 both before and after a successful refresh issues
/// exactly two calls to the wrapped endpoint, then clears the session.
#[tokio::test]
async fn test_no_double_retry_and_session_clear_on_second_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "T1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let response = client
        .send(ApiRequest::get("/api/v1/user/self"))
        .await
        .unwrap();

    // The second 401 is returned unchanged, and the session is gone
    assert_eq!(response.status().as_u16(), 401);
    assert!(client.token_store().get().await.is_empty());
    assert!(client.current_user().await.is_none());
}

/// A rejected refresh leaves the token store untouched; the retry goes out
/// with the old token.
#[tokio::test]
async fn test_refresh_failure_leaves_token_untouched() {
    let server = MockServer::start().await;

    // First call with T1 is rejected, the retry with the same (unchanged)
    // token succeeds
    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T1")).await;

    let response = client
        .send(ApiRequest::get("/api/v1/user/self"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(client.token_store().get().await.as_str(), "T1");
}

/// Token "T1" is expired server-side and the refresh itself is rejected:
/// the retry still carries "Bearer T1", comes back 401, and the session is
/// cleared.
#[tokio::test]
async fn test_rejected_refresh_then_rejected_retry_clears_session() {
    let server = MockServer::start().await;

    // Both the initial attempt and the retry must carry the unchanged token
    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T1")).await;

    let response = client
        .send(ApiRequest::get("/api/v1/user/self"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    assert!(client.token_store().get().await.is_empty());
}

#[tokio::test]
async fn test_transport_failure_propagates_without_session_clear() {
    // Nothing listens on port 9: connections are refused immediately
    let base = BaseUrl::new("http://127.0.0.1:9").unwrap();
    let client = ApiClient::new(&ClientConfig::new(base)).unwrap();
    client.token_store().set(AccessToken::new("T0")).await;

    let result = client.send(ApiRequest::get("/api/v1/user/self")).await;

    assert!(matches!(result, Err(Error::Transport(_))));
    assert_eq!(client.token_store().get().await.as_str(), "T0");
}

// ============================================================================
// Session Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_session_clear_is_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "T0" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client
        .login(&Credentials::new("alice", "secret"))
        .await
        .unwrap();
    assert!(client.current_user().await.is_some());

    client.clear_session().await;
    assert!(client.token_store().get().await.is_empty());
    assert!(client.current_user().await.is_none());

    // Clearing again must be safe and end in the same state
    client.clear_session().await;
    assert!(client.token_store().get().await.is_empty());
    assert!(client.current_user().await.is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    client.logout().await.unwrap();
    assert!(client.token_store().get().await.is_empty());
}

#[tokio::test]
async fn test_failed_logout_leaves_session_intact() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "logout failed"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let result = client.logout().await;
    assert!(result.is_err());
    assert_eq!(client.token_store().get().await.as_str(), "T0");
}

// ============================================================================
// Typed Operation Tests
// ============================================================================

#[tokio::test]
async fn test_find_accounts_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts"))
        .and(header("authorization", "Bearer T0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skip": 0,
            "limit": 10,
            "total": 1,
            "data": [user_body()]
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let page = client.find_accounts(&FindQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].username, "alice");
}

#[tokio::test]
async fn test_typed_operation_surfaces_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "username-duplicate"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.token_store().set(AccessToken::new("T0")).await;

    let request = lanyard_contract::CreateAccountRequest {
        username: "alice",
        password: "secret",
        name: "Alice",
        description: None,
    };
    let error = client.create_account(&request).await.unwrap_err();

    match error {
        Error::Api(api) => {
            assert_eq!(api.status, 400);
            assert_eq!(api.message.as_deref(), Some("username-duplicate"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}
