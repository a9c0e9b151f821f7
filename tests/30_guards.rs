mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use brickvault_api::auth::{self, Claims};
use common::{body_json, get, post_json, send, test_app, token_for, with_bearer};

#[tokio::test]
async fn protected_route_requires_token() {
    let response = send(test_app(), get("/api/v1/sets")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn garbage_token_is_rejected_generically() {
    let request = with_bearer(get("/api/v1/sets"), "not.a.jwt");
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn wrong_scheme_is_rejected() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/sets")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "user@example.com".into(),
        role: "user".into(),
        iat: (now - Duration::hours(3)).timestamp(),
        exp: (now - Duration::hours(2)).timestamp(),
    };
    let token = auth::issue_token(&claims).unwrap();

    let request = with_bearer(get("/api/v1/sets"), &token);
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn admin_delete_forbidden_for_plain_user() {
    let token = token_for("user");
    let request = with_bearer(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/pieces/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap(),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Insufficient role for this operation");
}

#[tokio::test]
async fn me_admin_forbidden_for_plain_user() {
    let token = token_for("user");
    let request = with_bearer(get("/api/v1/auth/me-admin"), &token);
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_role_claim_gets_no_admin_access() {
    let token = token_for("superuser");
    let request = with_bearer(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/manufacturers/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap(),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn register_and_login_stay_public() {
    // No Authorization header; validation rejects the payload before any
    // database access, proving the auth layer does not intercept first.
    let request = post_json(
        "/api/v1/auth/register",
        json!({ "email": "bad", "password": "bad" }),
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
