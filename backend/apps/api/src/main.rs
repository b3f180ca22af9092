//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::middleware::{SessionMiddlewareState, require_session};
use accounts::{AccountsConfig, AppMailer, PgAccountRepository, ResendMailer, accounts_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,accounts=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let repo_for_cleanup = PgAccountRepository::new(pool.clone());
    match repo_for_cleanup.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Accounts configuration
    let mut config = if cfg!(debug_assertions) {
        AccountsConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "SESSION_SECRET must decode to 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AccountsConfig {
            session_secret: secret,
            ..AccountsConfig::default()
        }
    };

    if let Ok(base_url) = env::var("APP_BASE_URL") {
        config.base_url = base_url;
    }

    // Mail delivery
    let mailer = match env::var("RESEND_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => {
            let from = env::var("MAIL_FROM")
                .unwrap_or_else(|_| "onboarding@resend.dev".to_string());
            AppMailer::Resend(ResendMailer::new(api_key, from))
        }
        _ => {
            tracing::warn!("RESEND_API_KEY not set; verification mail disabled");
            AppMailer::Disabled
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let repo = PgAccountRepository::new(pool.clone());

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            accounts_router(repo.clone(), mailer, config.clone()),
        )
        .nest("/api", protected_router(repo, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31180);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Routes that require a signed-in account
fn protected_router(repo: PgAccountRepository, config: AccountsConfig) -> Router {
    let state = SessionMiddlewareState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/settings", get(settings))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            require_session(state.clone(), req, next)
        }))
}

async fn dashboard() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "page": "dashboard" }))
}

async fn settings() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "page": "settings" }))
}
