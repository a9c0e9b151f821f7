mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, post_json, send, test_app};

// Registration validation runs before any database round trip, so these
// paths are exercised end to end against the router.

#[tokio::test]
async fn register_rejects_weak_password() {
    let request = post_json(
        "/api/v1/auth/register",
        json!({ "email": "user@example.com", "password": "short" }),
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("at least 8 characters"));
}

#[tokio::test]
async fn register_rejects_password_without_symbol() {
    let request = post_json(
        "/api/v1/auth/register",
        json!({ "email": "user@example.com", "password": "Abcdefg1" }),
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let request = post_json(
        "/api/v1/auth/register",
        json!({ "email": "not-an-email", "password": "Sup3rSecret!" }),
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn register_rejects_unknown_role() {
    let request = post_json(
        "/api/v1/auth/register",
        json!({
            "email": "user@example.com",
            "password": "Sup3rSecret!",
            "role": "superuser"
        }),
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("role"));
}
