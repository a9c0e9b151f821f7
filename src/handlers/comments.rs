use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::query::{self, Arg, Filters};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Comment, CreateComment, UpdateComment};
use crate::pagination::{Page, PageRequest};
use crate::AppState;

const SORTABLE: &[&str] = &["created_at"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list).post(create))
        .route(
            "/comments/:id",
            get(get_by_id)
                .put(replace)
                .patch(update)
                .delete(delete_by_id),
        )
}

#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/comments
async fn list(
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> Result<Json<Page<Comment>>, ApiError> {
    let mut filters = Filters::new();
    if let Some(target_type) = &params.target_type {
        filters.eq("target_type", Arg::Text(target_type.clone()));
    }
    if let Some(target_id) = params
        .target_id
        .as_deref()
        .and_then(|v| Uuid::parse_str(v).ok())
    {
        filters.eq("target_id", Arg::Uuid(target_id));
    }
    if let Some(user_id) = params.user_id.as_deref().and_then(|v| Uuid::parse_str(v).ok()) {
        filters.eq("user_id", Arg::Uuid(user_id));
    }

    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort.as_deref(),
        SORTABLE,
    );
    let (items, total) =
        query::fetch_page::<Comment>(&state.pool, "comments", &filters, &page).await?;
    Ok(Json(Page::new(items, total, &page)))
}

/// GET /api/v1/comments/:id
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    Ok(Json(comment))
}

/// POST /api/v1/comments - the author is always the authenticated caller
async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(dto): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    dto.validate()?;

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (user_id, target_type, target_id, content) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(auth_user.id)
    .bind(&dto.target_type)
    .bind(dto.target_id)
    .bind(&dto.content)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/v1/comments/:id - full replace; the author never changes
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateComment>,
) -> Result<Json<Comment>, ApiError> {
    dto.validate()?;

    let comment = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET target_type = $1, target_id = $2, content = $3 \
         WHERE id = $4 RETURNING *",
    )
    .bind(&dto.target_type)
    .bind(dto.target_id)
    .bind(&dto.content)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(comment))
}

/// PATCH /api/v1/comments/:id - only the content can change
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateComment>,
) -> Result<Json<Comment>, ApiError> {
    dto.validate()?;
    if dto.is_empty() {
        return get_by_id(State(state), Path(id)).await;
    }

    let comment = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET content = $1 WHERE id = $2 RETURNING *",
    )
    .bind(dto.content.as_deref().unwrap_or_default())
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(comment))
}

/// DELETE /api/v1/comments/:id
async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
    let comment = sqlx::query_as::<_, Comment>("DELETE FROM comments WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(Json(comment))
}
