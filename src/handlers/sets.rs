use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::models::{CreateSet, Manufacturer, Set, SetWithManufacturer, UpdateSet};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const CONFLICT: &str = "A set with this manufacturer and manufacturer_reference already exists";
const SORTABLE: &[&str] = &["created_at", "name", "year", "piece_count"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sets", get(list).post(create))
        .route(
            "/sets/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct SetListParams {
    pub search: Option<String>,
    pub theme: Option<String>,
    pub year: Option<String>,
    pub pieces_min: Option<String>,
    pub pieces_max: Option<String>,
    pub manufacturer: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/sets - list with the manufacturer populated on each item
async fn list(
    State(state): State<AppState>,
    Query(params): Query<SetListParams>,
) -> Result<Json<Page<SetWithManufacturer>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(search) = &params.search {
        filters.contains("name", search);
    }
    if let Some(theme) = &params.theme {
        filters.eq("theme", Arg::Text(theme.clone()));
    }
    // Numeric and id params arrive as strings; unparseable values are
    // ignored rather than rejected.
    if let Some(year) = params.year.as_deref().and_then(|v| v.parse::<i64>().ok()) {
        filters.eq("year", Arg::Int(year));
    }
    if let Some(min) = params
        .pieces_min
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok())
    {
        filters.gte("piece_count", Arg::Int(min));
    }
    if let Some(max) = params
        .pieces_max
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok())
    {
        filters.lte("piece_count", Arg::Int(max));
    }
    if let Some(manufacturer) = params
        .manufacturer
        .as_deref()
        .and_then(|v| Uuid::parse_str(v).ok())
    {
        filters.eq("manufacturer_id", Arg::Uuid(manufacturer));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) = query::fetch_page::<Set>(&state.pool, "sets", &filters, &page).await?;
    let items = populate_manufacturers(&state, items).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/sets/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SetWithManufacturer>, ApiError> {
    let set = fetch_set(&state, id).await?;
    let populated = populate_manufacturers(&state, vec![set]).await?;
    let item = populated
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Set not found"))?;
    Ok(Json(item))
}

/// POST /api/v1/sets
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateSet>,
) -> Result<(StatusCode, Json<SetWithManufacturer>), ApiError> {
    dto.validate()?;

    let set = sqlx::query_as::<_, Set>(
        "INSERT INTO sets (name, manufacturer_id, manufacturer_reference, year, theme, piece_count, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&dto.name)
    .bind(dto.manufacturer_id)
    .bind(&dto.manufacturer_reference)
    .bind(dto.year)
    .bind(&dto.theme)
    .bind(dto.piece_count)
    .bind(&dto.image_url)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?;

    let populated = populate_manufacturers(&state, vec![set]).await?;
    let item = populated
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created set"))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/sets/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateSet>,
) -> Result<Json<SetWithManufacturer>, ApiError> {
    dto.validate()?;

    let set = sqlx::query_as::<_, Set>(
        "UPDATE sets SET name = $1, manufacturer_id = $2, manufacturer_reference = $3, \
         year = $4, theme = $5, piece_count = $6, image_url = $7 \
         WHERE id = $8 RETURNING *",
    )
    .bind(&dto.name)
    .bind(dto.manufacturer_id)
    .bind(&dto.manufacturer_reference)
    .bind(dto.year)
    .bind(&dto.theme)
    .bind(dto.piece_count)
    .bind(&dto.image_url)
    .bind(id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?
    .ok_or_else(|| ApiError::not_found("Set not found"))?;

    let populated = populate_manufacturers(&state, vec![set]).await?;
    let item = populated
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal_server_error("Failed to load updated set"))?;
    Ok(Json(item))
}

/// PATCH /api/v1/sets/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateSet>,
) -> Result<Json<SetWithManufacturer>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let mut qb = QueryBuilder::new("UPDATE sets SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(name) = &dto.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(manufacturer_id) = dto.manufacturer_id {
            fields
                .push("manufacturer_id = ")
                .push_bind_unseparated(manufacturer_id);
        }
        if let Some(reference) = &dto.manufacturer_reference {
            fields
                .push("manufacturer_reference = ")
                .push_bind_unseparated(reference);
        }
        if let Some(year) = dto.year {
            fields.push("year = ").push_bind_unseparated(year);
        }
        if let Some(theme) = &dto.theme {
            fields.push("theme = ").push_bind_unseparated(theme);
        }
        if let Some(piece_count) = dto.piece_count {
            fields
                .push("piece_count = ")
                .push_bind_unseparated(piece_count);
        }
        if let Some(image_url) = &dto.image_url {
            fields.push("image_url = ").push_bind_unseparated(image_url);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let set = qb
        .build_query_as::<Set>()
        .fetch_optional(&state.pool)
        .await
        .map_err(|e| ApiError::map_unique(e, CONFLICT))?
        .ok_or_else(|| ApiError::not_found("Set not found"))?;

    let populated = populate_manufacturers(&state, vec![set]).await?;
    let item = populated
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal_server_error("Failed to load updated set"))?;
    Ok(Json(item))
}

/// DELETE /api/v1/sets/:id
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Set>, ApiError> {
    let set = sqlx::query_as::<_, Set>("DELETE FROM sets WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Set not found"))?;

    Ok(Json(set))
}

async fn fetch_set(state: &AppState, id: Uuid) -> Result<Set, ApiError> {
    sqlx::query_as::<_, Set>("SELECT * FROM sets WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Set not found"))
}

/// Batch-populate the manufacturer reference on a page of sets. A dangling
/// manufacturer_id (manufacturer deleted) populates as null.
async fn populate_manufacturers(
    state: &AppState,
    sets: Vec<Set>,
) -> Result<Vec<SetWithManufacturer>, ApiError> {
    let mut ids: Vec<Uuid> = sets.iter().map(|s| s.manufacturer_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let manufacturers =
        query::fetch_by_ids::<Manufacturer>(&state.pool, "manufacturers", &ids).await?;
    let by_id: HashMap<Uuid, Manufacturer> =
        manufacturers.into_iter().map(|m| (m.id, m)).collect();

    Ok(sets
        .into_iter()
        .map(|set| {
            let manufacturer = by_id.get(&set.manufacturer_id).cloned();
            SetWithManufacturer { set, manufacturer }
        })
        .collect())
}
