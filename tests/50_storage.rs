mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{
    body_json, delete, get, patch_json, post_json, put_json, send, storage_app, token_for,
    with_bearer,
};

// Storage-level behavior needs a live Postgres; each test skips when
// DATABASE_URL is not set. Natural keys are randomized so reruns against
// the same database stay independent.

#[tokio::test]
async fn duplicate_natural_key_is_rejected() {
    let Some(app) = storage_app().await else { return };
    let token = token_for("user");

    let body = json!({ "name": format!("manufacturer-{}", Uuid::new_v4()) });
    let response = send(
        app.clone(),
        with_bearer(post_json("/api/v1/manufacturers", body.clone()), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        with_bearer(post_json("/api/v1/manufacturers", body), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn empty_list_has_zero_total() {
    let Some(app) = storage_app().await else { return };
    let token = token_for("user");

    // A country nobody registered under guarantees an empty result
    let uri = format!("/api/v1/manufacturers?country={}", Uuid::new_v4());
    let response = send(app, with_bearer(get(&uri), &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 0);
    assert_eq!(body["pages"], 0);
}

#[tokio::test]
async fn page_window_of_one_echoes_the_request() {
    let Some(app) = storage_app().await else { return };
    let token = token_for("user");

    let supplier = format!("supplier-{}", Uuid::new_v4());
    for _ in 0..2 {
        let response = send(
            app.clone(),
            with_bearer(
                post_json(
                    "/api/v1/marketplace",
                    json!({ "piece_id": Uuid::new_v4(), "supplier": supplier.as_str() }),
                ),
                &token,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let uri = format!("/api/v1/marketplace?supplier={}&page=1&limit=1", supplier);
    let response = send(app, with_bearer(get(&uri), &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["pages"], 2);
}

#[tokio::test]
async fn set_round_trip_keeps_manufacturer_populated() {
    let Some(app) = storage_app().await else { return };
    let token = token_for("user");

    let manufacturer_name = format!("manufacturer-{}", Uuid::new_v4());
    let response = send(
        app.clone(),
        with_bearer(
            post_json(
                "/api/v1/manufacturers",
                json!({ "name": manufacturer_name.as_str() }),
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let manufacturer_id = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let reference = format!("SC-{}", Uuid::new_v4());
    let response = send(
        app.clone(),
        with_bearer(
            post_json(
                "/api/v1/sets",
                json!({
                    "name": "Star Cruiser",
                    "manufacturer_id": manufacturer_id.as_str(),
                    "manufacturer_reference": reference.as_str(),
                    "year": 2024
                }),
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["manufacturer"]["name"], manufacturer_name.as_str());
    let id = created["id"].as_str().unwrap().to_string();

    let response = send(
        app.clone(),
        with_bearer(get(&format!("/api/v1/sets/{}", id)), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["name"], "Star Cruiser");
    assert_eq!(fetched["year"], 2024);

    let response = send(
        app.clone(),
        with_bearer(
            put_json(
                &format!("/api/v1/sets/{}", id),
                json!({
                    "name": "Star Cruiser Mk II",
                    "manufacturer_id": manufacturer_id.as_str(),
                    "manufacturer_reference": reference.as_str(),
                    "year": 2025
                }),
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced = body_json(response).await;
    assert_eq!(replaced["name"], "Star Cruiser Mk II");
    assert_eq!(replaced["year"], 2025);
    assert_eq!(replaced["manufacturer"]["name"], manufacturer_name.as_str());

    let response = send(
        app.clone(),
        with_bearer(
            patch_json(&format!("/api/v1/sets/{}", id), json!({ "theme": "space" })),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await;
    assert_eq!(patched["theme"], "space");
    assert_eq!(patched["name"], "Star Cruiser Mk II");
    assert_eq!(patched["manufacturer"]["name"], manufacturer_name.as_str());

    let response = send(
        app.clone(),
        with_bearer(delete(&format!("/api/v1/sets/{}", id)), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["id"], id.as_str());

    let response = send(
        app,
        with_bearer(get(&format!("/api/v1/sets/{}", id)), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventory_uniqueness_holds_without_a_piece() {
    let Some(app) = storage_app().await else { return };
    let token = token_for("user");

    // piece_id absent on both inserts; the second must still collide
    let body = json!({ "user_id": Uuid::new_v4(), "set_id": Uuid::new_v4() });
    let response = send(
        app.clone(),
        with_bearer(post_json("/api/v1/inventory", body.clone()), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        with_bearer(post_json("/api/v1/inventory", body), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}
