pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;

use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the full application router. Everything under /api/v1 except
/// register and login requires a valid bearer token.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(handlers::auth::protected_routes())
        .merge(handlers::manufacturers::routes())
        .merge(handlers::sets::routes())
        .merge(handlers::pieces::routes())
        .merge(handlers::instructions::routes())
        .merge(handlers::inventory::routes())
        .merge(handlers::marketplace::routes())
        .merge(handlers::comments::routes())
        .merge(handlers::user_sets::routes())
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth));

    let api = handlers::auth::public_routes().merge(protected);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
