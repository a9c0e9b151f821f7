use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Role};
use crate::models::{CreatePiece, Piece, UpdatePiece};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const CONFLICT: &str = "A piece with this reference already exists";
const SORTABLE: &[&str] = &["created_at", "name", "reference", "color"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pieces", get(list).post(create))
        .route(
            "/pieces/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct PieceListParams {
    pub name: Option<String>,
    pub color: Option<String>,
    pub reference: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/pieces
async fn list(
    State(state): State<AppState>,
    Query(params): Query<PieceListParams>,
) -> Result<Json<Page<Piece>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(name) = &params.name {
        filters.contains("name", name);
    }
    if let Some(color) = &params.color {
        filters.eq("color", Arg::Text(color.clone()));
    }
    if let Some(reference) = &params.reference {
        filters.eq("reference", Arg::Text(reference.clone()));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) = query::fetch_page::<Piece>(&state.pool, "pieces", &filters, &page).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/pieces/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Piece>, ApiError> {
    let piece = sqlx::query_as::<_, Piece>("SELECT * FROM pieces WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Piece not found"))?;
    Ok(Json(piece))
}

/// POST /api/v1/pieces
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreatePiece>,
) -> Result<(StatusCode, Json<Piece>), ApiError> {
    dto.validate()?;

    let piece = sqlx::query_as::<_, Piece>(
        "INSERT INTO pieces (reference, name, color, image_url) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&dto.reference)
    .bind(&dto.name)
    .bind(&dto.color)
    .bind(&dto.image_url)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?;

    Ok((StatusCode::CREATED, Json(piece)))
}

/// PUT /api/v1/pieces/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreatePiece>,
) -> Result<Json<Piece>, ApiError> {
    dto.validate()?;

    let piece = sqlx::query_as::<_, Piece>(
        "UPDATE pieces SET reference = $1, name = $2, color = $3, image_url = $4 \
         WHERE id = $5 RETURNING *",
    )
    .bind(&dto.reference)
    .bind(&dto.name)
    .bind(&dto.color)
    .bind(&dto.image_url)
    .bind(id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?
    .ok_or_else(|| ApiError::not_found("Piece not found"))?;

    Ok(Json(piece))
}

/// PATCH /api/v1/pieces/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePiece>,
) -> Result<Json<Piece>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let mut qb = QueryBuilder::new("UPDATE pieces SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(reference) = &dto.reference {
            fields.push("reference = ").push_bind_unseparated(reference);
        }
        if let Some(name) = &dto.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(color) = &dto.color {
            fields.push("color = ").push_bind_unseparated(color);
        }
        if let Some(image_url) = &dto.image_url {
            fields.push("image_url = ").push_bind_unseparated(image_url);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let piece = qb
        .build_query_as::<Piece>()
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| ApiError::map_unique(e, CONFLICT))?
        .ok_or_else(|| ApiError::not_found("Piece not found"))?;

    Ok(Json(piece))
}

/// DELETE /api/v1/pieces/:id - admin only
async fn delete_by_id(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Piece>, ApiError> {
    auth_user.require_role(Role::Admin)?;

    let piece = sqlx::query_as::<_, Piece>("DELETE FROM pieces WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Piece not found"))?;

    Ok(Json(piece))
}
