// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::charge_service::ChargeService;
use crate::application::import_service::ImportService;
use crate::application::insights_service::InsightsService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_store::JsonFileStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_charge, delete_all_charges, delete_charge, export_charges, get_insights, health_check,
    import_charges, list_charges,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(JsonFileStore::new(app_config.store.data_file.clone()));

    // Create services (application layer)
    let charge_service = ChargeService::new(repository.clone());
    let insights_service =
        InsightsService::new(repository.clone(), app_config.battery.default_capacity_kwh);
    let import_service = ImportService::new(repository);

    // Create application state
    let state = Arc::new(AppState {
        charge_service,
        insights_service,
        import_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route(
            "/api/charges",
            get(list_charges)
                .post(create_charge)
                .delete(delete_all_charges),
        )
        .route("/api/charges/:id", delete(delete_charge))
        .route("/api/insights", get(get_insights))
        .route("/api/import", post(import_charges))
        .route("/api/export", get(export_charges))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::new(app_config.server.host.parse()?, app_config.server.port);
    info!("starting ev-charge-log service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
