// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::auth_service::AuthService;
use crate::application::city_service::CityService;
use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::{load_app_config, load_city_catalog};
use crate::infrastructure::open_meteo_repository::OpenMeteoRepository;
use crate::infrastructure::record_cache::CachingRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, list_cities, login, logout, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config("config/app")?;
    let catalog = load_city_catalog("config/cities")?;
    tracing::info!("Loaded {} cities", catalog.cities.len());

    // Create repository (infrastructure layer)
    let upstream = Arc::new(OpenMeteoRepository::new(
        app_config.upstream.base_url,
        Duration::from_secs(app_config.upstream.timeout_secs),
    )?);
    let repository = Arc::new(CachingRepository::new(
        upstream,
        Duration::from_secs(app_config.cache.record_ttl_secs),
    ));

    // Create services (application layer)
    let city_service = CityService::new(catalog.cities);
    let dashboard_service = DashboardService::new(repository, city_service.clone());
    let streaming_service =
        StreamingDashboardService::new(city_service.clone(), dashboard_service.clone());
    let auth_service = AuthService::new(app_config.auth.username, app_config.auth.password);

    // Create application state
    let state = Arc::new(AppState {
        auth_service,
        city_service,
        dashboard_service,
        streaming_service,
    });

    // Build router (presentation layer)
    // JSON bodies are compressed in the response builders, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/cities", get(list_cities))
        .route("/dashboards/:city", get(get_dashboard))
        .route("/dashboards/:city/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.server.bind.parse()?;
    tracing::info!("Starting air-quality-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
