// src/main.rs

use std::env;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod history;
mod metrics;
mod models;
mod routes;
mod sheets;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<config::AppConfig>,
    pub sheets: sheets::SheetsClient,
    pub cache: Arc<cache::SheetCache>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("practice_pulse_api=info,tower_http=info")),
        )
        .init();

    let cfg = config::AppConfig::from_env();
    let sheets = sheets::SheetsClient::new(cfg.spreadsheet_id.clone(), cfg.api_key.clone())?;
    let cache = cache::SheetCache::new(cfg.cache_ttl);

    let location_count = cfg.locations.len();
    let ttl_secs = cfg.cache_ttl.as_secs();

    let state = AppState {
        cfg: Arc::new(cfg),
        sheets,
        cache: Arc::new(cache),
    };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Root API router
    let api = Router::new()
        // health
        .route("/health", get(routes::health::health))
        // dashboard reads
        .route("/api/v1/locations", get(routes::locations::list_locations))
        .route("/api/v1/kpis", get(routes::kpis::get_kpis))
        .route("/api/v1/kpis/:kpi/history", get(routes::history::get_history))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Port (axum 0.7 style)
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080); // default 8080

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    println!("✅ {location_count} location(s) configured, sheet cache TTL {ttl_secs}s");
    println!("🚀 API listening on http://127.0.0.1:{port}");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
