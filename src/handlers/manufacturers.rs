use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Role};
use crate::models::{
    CreateManufacturer, Manufacturer, ManufacturerWithSets, Set, UpdateManufacturer,
};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const CONFLICT: &str = "A manufacturer with this name already exists";
const SORTABLE: &[&str] = &["created_at", "name", "country"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/manufacturers", get(list).post(create))
        .route(
            "/manufacturers/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct ManufacturerListParams {
    pub country: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManufacturerGetParams {
    pub populate: Option<String>,
}

/// GET /api/v1/manufacturers
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ManufacturerListParams>,
) -> Result<Json<Page<Manufacturer>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(country) = &params.country {
        filters.eq("country", Arg::Text(country.clone()));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) =
        query::fetch_page::<Manufacturer>(&state.pool, "manufacturers", &filters, &page).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/manufacturers/:id - optionally populates the back-referenced
/// sets with ?populate=sets
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ManufacturerGetParams>,
) -> Result<Response, ApiError> {
    let manufacturer = sqlx::query_as::<_, Manufacturer>("SELECT * FROM manufacturers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Manufacturer not found"))?;

    if params.populate.as_deref() == Some("sets") {
        let sets = sqlx::query_as::<_, Set>(
            "SELECT * FROM sets WHERE manufacturer_id = $1 ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(&state.pool)
        .await?;
        return Ok(Json(ManufacturerWithSets { manufacturer, sets }).into_response());
    }

    Ok(Json(manufacturer).into_response())
}

/// POST /api/v1/manufacturers
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateManufacturer>,
) -> Result<(StatusCode, Json<Manufacturer>), ApiError> {
    dto.validate()?;

    let manufacturer = sqlx::query_as::<_, Manufacturer>(
        "INSERT INTO manufacturers (name, country, website) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&dto.name)
    .bind(&dto.country)
    .bind(&dto.website)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?;

    Ok((StatusCode::CREATED, Json(manufacturer)))
}

/// PUT /api/v1/manufacturers/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateManufacturer>,
) -> Result<Json<Manufacturer>, ApiError> {
    dto.validate()?;

    let manufacturer = sqlx::query_as::<_, Manufacturer>(
        "UPDATE manufacturers SET name = $1, country = $2, website = $3 \
         WHERE id = $4 RETURNING *",
    )
    .bind(&dto.name)
    .bind(&dto.country)
    .bind(&dto.website)
    .bind(id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?
    .ok_or_else(|| ApiError::not_found("Manufacturer not found"))?;

    Ok(Json(manufacturer))
}

/// PATCH /api/v1/manufacturers/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateManufacturer>,
) -> Result<Json<Manufacturer>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        let manufacturer =
            sqlx::query_as::<_, Manufacturer>("SELECT * FROM manufacturers WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
                .ok_or_else(|| ApiError::not_found("Manufacturer not found"))?;
        return Ok(Json(manufacturer));
    }

    let mut qb = QueryBuilder::new("UPDATE manufacturers SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(name) = &dto.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(country) = &dto.country {
            fields.push("country = ").push_bind_unseparated(country);
        }
        if let Some(website) = &dto.website {
            fields.push("website = ").push_bind_unseparated(website);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let manufacturer = qb
        .build_query_as::<Manufacturer>()
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| ApiError::map_unique(e, CONFLICT))?
        .ok_or_else(|| ApiError::not_found("Manufacturer not found"))?;

    Ok(Json(manufacturer))
}

/// DELETE /api/v1/manufacturers/:id - admin only. Does not cascade: the
/// manufacturer's sets keep their now-dangling reference.
async fn delete_by_id(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Manufacturer>, ApiError> {
    auth_user.require_role(Role::Admin)?;

    let manufacturer =
        sqlx::query_as::<_, Manufacturer>("DELETE FROM manufacturers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Manufacturer not found"))?;

    Ok(Json(manufacturer))
}
