use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{PgCatalogRepository, PgProgressRepository};
use application::ProgressService;
use config::AppConfig;
use dividis::{ProgressEngine, SystemClock};

/// Application service with concrete repository implementations
pub type AppProgressService = ProgressService<PgCatalogRepository, PgProgressRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub progress: Arc<AppProgressService>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    database: String,
    version: String,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "unavailable"
        }
    };

    Json(HealthCheck {
        status: "ok".to_string(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Dividis API initializing...");

    // Local .env for development; missing file is fine
    let _ = dotenvy::dotenv();

    let config =
        AppConfig::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()))?;

    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No DIVIDIS_API_KEY set - authentication disabled");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;

    tracing::info!("Database migrations completed");

    // Initialize application services
    let catalog = Arc::new(PgCatalogRepository::new(pool.clone()));
    let progress = Arc::new(PgProgressRepository::new(pool.clone()));
    let engine = ProgressEngine::new(catalog, progress, Arc::new(SystemClock), config.progress);

    let state = AppState {
        pool,
        progress: Arc::new(ProgressService::new(engine)),
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::modules::router())
        .merge(routes::missions::router())
        .merge(routes::progress::router())
        .merge(routes::declarations::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Dividis API ready");

    Ok(router.into())
}
