mod common;

use axum::http::StatusCode;

use common::{body_json, get, send, test_app};

#[tokio::test]
async fn health_responds_without_auth() {
    let response = send(test_app(), get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "brickvault-api");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = send(test_app(), get("/api/v2/sets")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
