use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Role};
use crate::models::inventory::InventoryPiece;
use crate::models::{CreateInventory, Inventory, UpdateInventory};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const CONFLICT: &str = "An inventory entry for this user, set and piece already exists";
const SORTABLE: &[&str] = &["created_at", "quantity"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list).post(create))
        .route(
            "/inventory/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct InventoryListParams {
    pub user_id: Option<String>,
    pub set_id: Option<String>,
    pub piece_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/inventory
async fn list(
    State(state): State<AppState>,
    Query(params): Query<InventoryListParams>,
) -> Result<Json<Page<Inventory>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(user_id) = params.user_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("user_id", Arg::Uuid(user_id));
    }
    if let Some(set_id) = params.set_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("set_id", Arg::Uuid(set_id));
    }
    if let Some(piece_id) = params.piece_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("piece_id", Arg::Uuid(piece_id));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) =
        query::fetch_page::<Inventory>(&state.pool, "inventory", &filters, &page).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/inventory/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Inventory>, ApiError> {
    let entry = sqlx::query_as::<_, Inventory>("SELECT * FROM inventory WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory entry not found"))?;
    Ok(Json(entry))
}

/// POST /api/v1/inventory
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateInventory>,
) -> Result<(StatusCode, Json<Inventory>), ApiError> {
    dto.validate()?;
    let pieces = encode_pieces(dto.pieces.as_deref())?;

    let entry = sqlx::query_as::<_, Inventory>(
        "INSERT INTO inventory (user_id, set_id, piece_id, quantity, pieces) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(dto.user_id)
    .bind(dto.set_id)
    .bind(dto.piece_id)
    .bind(dto.quantity.unwrap_or(1))
    .bind(pieces)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/inventory/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateInventory>,
) -> Result<Json<Inventory>, ApiError> {
    dto.validate()?;
    let pieces = encode_pieces(dto.pieces.as_deref())?;

    let entry = sqlx::query_as::<_, Inventory>(
        "UPDATE inventory SET user_id = $1, set_id = $2, piece_id = $3, quantity = $4, \
         pieces = $5 WHERE id = $6 RETURNING *",
    )
    .bind(dto.user_id)
    .bind(dto.set_id)
    .bind(dto.piece_id)
    .bind(dto.quantity.unwrap_or(1))
    .bind(pieces)
    .bind(id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?
    .ok_or_else(|| ApiError::not_found("Inventory entry not found"))?;

    Ok(Json(entry))
}

/// PATCH /api/v1/inventory/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateInventory>,
) -> Result<Json<Inventory>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let mut qb = QueryBuilder::new("UPDATE inventory SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(user_id) = dto.user_id {
            fields.push("user_id = ").push_bind_unseparated(user_id);
        }
        if let Some(set_id) = dto.set_id {
            fields.push("set_id = ").push_bind_unseparated(set_id);
        }
        if let Some(piece_id) = dto.piece_id {
            fields.push("piece_id = ").push_bind_unseparated(piece_id);
        }
        if let Some(quantity) = dto.quantity {
            fields.push("quantity = ").push_bind_unseparated(quantity);
        }
        if let Some(pieces) = &dto.pieces {
            let encoded = encode_pieces(Some(pieces))?;
            fields.push("pieces = ").push_bind_unseparated(encoded);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let entry = qb
        .build_query_as::<Inventory>()
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| ApiError::map_unique(e, CONFLICT))?
        .ok_or_else(|| ApiError::not_found("Inventory entry not found"))?;

    Ok(Json(entry))
}

/// DELETE /api/v1/inventory/:id - admin only
async fn delete_by_id(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Inventory>, ApiError> {
    auth_user.require_role(Role::Admin)?;

    let entry = sqlx::query_as::<_, Inventory>("DELETE FROM inventory WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory entry not found"))?;

    Ok(Json(entry))
}

fn encode_pieces(pieces: Option<&[InventoryPiece]>) -> Result<Value, ApiError> {
    serde_json::to_value(pieces.unwrap_or_default()).map_err(|e| {
        tracing::error!("failed to encode inventory pieces: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}
