mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{body_json, post_json, put_json, send, test_app, token_for, with_bearer};

// Payload validation runs before any database round trip, so an
// authenticated request with a bad body fails with 400 even against the
// unreachable test pool.

#[tokio::test]
async fn manufacturer_website_must_be_a_url() {
    let token = token_for("user");
    let request = with_bearer(
        post_json(
            "/api/v1/manufacturers",
            json!({ "name": "Blocko", "website": "not a url" }),
        ),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("website"));
}

#[tokio::test]
async fn manufacturer_name_is_required() {
    let token = token_for("user");
    let request = with_bearer(
        post_json("/api/v1/manufacturers", json!({ "name": "   " })),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_target_type_is_constrained() {
    let token = token_for("user");
    let request = with_bearer(
        post_json(
            "/api/v1/comments",
            json!({
                "target_type": "piece",
                "target_id": Uuid::new_v4(),
                "content": "nice"
            }),
        ),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("target_type"));
}

#[tokio::test]
async fn comment_replace_constrains_target_type_too() {
    let token = token_for("user");
    let request = with_bearer(
        put_json(
            &format!("/api/v1/comments/{}", Uuid::new_v4()),
            json!({
                "target_type": "piece",
                "target_id": Uuid::new_v4(),
                "content": "nice"
            }),
        ),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_set_quantity_must_be_positive() {
    let token = token_for("user");
    let request = with_bearer(
        post_json(
            "/api/v1/user-sets",
            json!({ "set_id": Uuid::new_v4(), "quantity": 0 }),
        ),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marketplace_price_cannot_be_negative() {
    let token = token_for("user");
    let request = with_bearer(
        post_json(
            "/api/v1/marketplace",
            json!({ "piece_id": Uuid::new_v4(), "price": -3.50 }),
        ),
        &token,
    );
    let response = send(test_app(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
