use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Role};
use crate::models::{User, UserPublic};
use crate::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/me-admin", get(me_admin))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// POST /api/v1/auth/register - Create a user account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    auth::validate_email(&req.email)?;
    auth::validate_password_strength(&req.password)?;

    let role = match req.role.as_deref() {
        None => Role::User,
        Some(r) => Role::parse(r)
            .ok_or_else(|| ApiError::bad_request("The role field must be one of: user, admin"))?,
    };

    let password_hash = auth::hash_password(&req.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&req.email)
    .bind(&password_hash)
    .bind(role.as_str())
    .fetch_one(&state.pool)
    .await
    .map_err(|e| ApiError::map_unique(e, "A user with this email already exists"))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/v1/auth/login - Verify credentials and issue a bearer token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.pool)
        .await?;

    // Missing user and wrong password must be indistinguishable to the
    // caller (no user enumeration).
    let user = match user {
        Some(u) if auth::verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(ApiError::unauthorized("Invalid credentials")),
    };

    let claims = Claims::new(user.id, user.email.clone(), user.role.clone());
    let access_token = auth::issue_token(&claims)?;

    Ok(Json(LoginResponse { access_token }))
}

/// GET /api/v1/auth/me - Current identity
async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserPublic>, ApiError> {
    fetch_user(&state, auth_user.id).await
}

/// GET /api/v1/auth/me-admin - Current identity, admin-only
async fn me_admin(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserPublic>, ApiError> {
    auth_user.require_role(Role::Admin)?;
    fetch_user(&state, auth_user.id).await
}

async fn fetch_user(state: &AppState, id: Uuid) -> Result<Json<UserPublic>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user.into()))
}
