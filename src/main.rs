use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod ai;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use config::Config;
use services::recommend::Recommender;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub recommender: Recommender,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lunalog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    // Database
    let db = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db).await?;
    tracing::info!("Database schema ready");

    if config.seed_sample_data {
        db::seed::seed_if_empty(&db).await?;
    }

    let model = ai::build_client(&config)?;
    let recommender = Recommender::new(db.clone(), model, config.recent_entry_limit);

    let state = AppState {
        db,
        config: config.clone(),
        recommender,
    };

    let app = app(state).layer(cors_layer(&config.cors_origins));

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Journal
        .route("/journal", post(handlers::journal::create_entry))
        .route("/journal/all", get(handlers::journal::list_entries))
        .route(
            "/journal/:id/insights",
            get(handlers::journal::list_entry_insights),
        )
        .route("/submit", post(handlers::journal::submit))
        // AI
        .route("/recommend", post(handlers::recommend::recommend))
        .route("/analyze", post(handlers::recommend::analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}
