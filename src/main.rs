use tracing_subscriber::EnvFilter;

use brickvault_api::{app, config, database, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("brickvault_api=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    if config.uses_dev_jwt_secret() {
        tracing::warn!("JWT_SECRET not set, using the development signing secret");
    }

    let pool = match database::connect_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        tracing::error!("failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("brickvault-api listening on {}", addr);

    if let Err(e) = axum::serve(listener, app(AppState { pool })).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
