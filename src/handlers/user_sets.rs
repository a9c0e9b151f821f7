use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use uuid::Uuid;

use crate::database::query;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{AssignUserSet, Set, UserSet, UserSetWithSet};
use crate::AppState;

const CONFLICT: &str = "This set is already assigned to the user";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user-sets", get(list).post(assign))
        .route("/user-sets/:set_id", axum::routing::delete(unassign))
}

/// GET /api/v1/user-sets - the caller's collection, with each set populated.
/// Returned as a bare list rather than a page envelope.
async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<UserSetWithSet>>, ApiError> {
    let user_sets = sqlx::query_as::<_, UserSet>(
        "SELECT * FROM user_sets WHERE user_id = $1 ORDER BY added_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.pool)
    .await?;

    let mut ids: Vec<Uuid> = user_sets.iter().map(|us| us.set_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let sets = query::fetch_by_ids::<Set>(&state.pool, "sets", &ids).await?;
    let by_id: HashMap<Uuid, Set> = sets.into_iter().map(|s| (s.id, s)).collect();

    Ok(Json(
        user_sets
            .into_iter()
            .map(|user_set| {
                let set = by_id.get(&user_set.set_id).cloned();
                UserSetWithSet { user_set, set }
            })
            .collect(),
    ))
}

/// POST /api/v1/user-sets - assign a set to the caller's collection
async fn assign(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(dto): Json<AssignUserSet>,
) -> Result<(StatusCode, Json<UserSet>), ApiError> {
    dto.validate()?;

    let user_set = sqlx::query_as::<_, UserSet>(
        "INSERT INTO user_sets (user_id, set_id, quantity) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(auth_user.id)
    .bind(dto.set_id)
    .bind(dto.quantity.unwrap_or(1))
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, CONFLICT))?;

    Ok((StatusCode::CREATED, Json(user_set)))
}

/// DELETE /api/v1/user-sets/:set_id - remove a set from the caller's
/// collection, keyed by set id rather than row id
async fn unassign(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(set_id): Path<Uuid>,
) -> Result<Json<UserSet>, ApiError> {
    let user_set = sqlx::query_as::<_, UserSet>(
        "DELETE FROM user_sets WHERE user_id = $1 AND set_id = $2 RETURNING *",
    )
    .bind(auth_user.id)
    .bind(set_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Set not found in the user's collection"))?;

    Ok(Json(user_set))
}
