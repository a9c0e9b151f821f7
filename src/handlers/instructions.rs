use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::models::{CreateInstruction, Instruction, UpdateInstruction};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const SORTABLE: &[&str] = &["created_at", "title", "language"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instructions", get(list).post(create))
        .route(
            "/instructions/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct InstructionListParams {
    pub set_id: Option<String>,
    pub uploader_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/instructions
async fn list(
    State(state): State<AppState>,
    Query(params): Query<InstructionListParams>,
) -> Result<Json<Page<Instruction>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(set_id) = params.set_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("set_id", Arg::Uuid(set_id));
    }
    if let Some(uploader_id) = params
        .uploader_id
        .as_deref()
        .and_then(|v| Uuid::parse_str(v).ok())
    {
        filters.eq("uploader_id", Arg::Uuid(uploader_id));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) =
        query::fetch_page::<Instruction>(&state.pool, "instructions", &filters, &page).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/instructions/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Instruction>, ApiError> {
    let instruction = sqlx::query_as::<_, Instruction>("SELECT * FROM instructions WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Instruction not found"))?;
    Ok(Json(instruction))
}

/// POST /api/v1/instructions
async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateInstruction>,
) -> Result<(StatusCode, Json<Instruction>), ApiError> {
    dto.validate()?;
    let steps = Value::Array(dto.steps.unwrap_or_default());

    let instruction = sqlx::query_as::<_, Instruction>(
        "INSERT INTO instructions (set_id, title, file_url, language, uploader_id, steps) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(dto.set_id)
    .bind(&dto.title)
    .bind(&dto.file_url)
    .bind(&dto.language)
    .bind(dto.uploader_id)
    .bind(steps)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(instruction)))
}

/// PUT /api/v1/instructions/:id - full replace
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateInstruction>,
) -> Result<Json<Instruction>, ApiError> {
    dto.validate()?;
    let steps = Value::Array(dto.steps.unwrap_or_default());

    let instruction = sqlx::query_as::<_, Instruction>(
        "UPDATE instructions SET set_id = $1, title = $2, file_url = $3, language = $4, \
         uploader_id = $5, steps = $6 WHERE id = $7 RETURNING *",
    )
    .bind(dto.set_id)
    .bind(&dto.title)
    .bind(&dto.file_url)
    .bind(&dto.language)
    .bind(dto.uploader_id)
    .bind(steps)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Instruction not found"))?;

    Ok(Json(instruction))
}

/// PATCH /api/v1/instructions/:id - partial update
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateInstruction>,
) -> Result<Json<Instruction>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let mut qb = QueryBuilder::new("UPDATE instructions SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(set_id) = dto.set_id {
            fields.push("set_id = ").push_bind_unseparated(set_id);
        }
        if let Some(title) = &dto.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(file_url) = &dto.file_url {
            fields.push("file_url = ").push_bind_unseparated(file_url);
        }
        if let Some(language) = &dto.language {
            fields.push("language = ").push_bind_unseparated(language);
        }
        if let Some(uploader_id) = dto.uploader_id {
            fields
                .push("uploader_id = ")
                .push_bind_unseparated(uploader_id);
        }
        if let Some(steps) = dto.steps {
            fields
                .push("steps = ")
                .push_bind_unseparated(Value::Array(steps));
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let instruction = qb
        .build_query_as::<Instruction>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Instruction not found"))?;

    Ok(Json(instruction))
}

/// DELETE /api/v1/instructions/:id
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Instruction>, ApiError> {
    let instruction =
        sqlx::query_as::<_, Instruction>("DELETE FROM instructions WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Instruction not found"))?;

    Ok(Json(instruction))
}
