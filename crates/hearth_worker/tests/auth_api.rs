use hearth_worker::{ApiError, AuthClient};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_submits_email_as_username_and_parses_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_partial_json(serde_json::json!({
            "username": "renter@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "acc-123",
            "refresh": "ref-456",
        })))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    let pair = client
        .login("renter@example.com", "hunter2")
        .await
        .expect("login");
    assert_eq!(pair.access, "acc-123");
    assert_eq!(pair.refresh, "ref-456");
}

#[tokio::test]
async fn login_failure_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    let err = client
        .login("renter@example.com", "wrong")
        .await
        .expect_err("rejected");
    assert!(matches!(err, ApiError::Status(401)));
}

#[tokio::test]
async fn refresh_returns_the_new_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .and(body_partial_json(serde_json::json!({ "refresh": "ref-456" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access": "acc-789" })),
        )
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    let access = client.refresh_access("ref-456").await.expect("refresh");
    assert_eq!(access, "acc-789");
}

#[tokio::test]
async fn current_user_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("Authorization", "Bearer acc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_type": "owner",
            "email": "owner@example.com",
        })))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    let user = client.current_user("acc-123").await.expect("profile");
    assert_eq!(user.user_type, "owner");
    assert_eq!(user.email.as_deref(), Some("owner@example.com"));
    assert_eq!(user.full_name, None);
}

#[tokio::test]
async fn requests_carry_no_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/password-reset/request/"))
        .and(header("Cache-Control", "no-cache"))
        .and(body_partial_json(
            serde_json::json!({ "email": "renter@example.com" }),
        ))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    client
        .request_password_reset("renter@example.com")
        .await
        .expect("reset requested");
}

#[tokio::test]
async fn malformed_payload_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).expect("client");
    let err = client
        .login("renter@example.com", "hunter2")
        .await
        .expect_err("decode failure");
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = AuthClient::new("not a url").expect_err("rejected");
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
}
