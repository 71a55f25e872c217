//! HTTP routing and server lifecycle.

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::association::AssociationStore;
use crate::config::Config;
use crate::task::{SharedTaskSource, TaskwarriorSource};

use super::dict;
use super::tasks;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task store every request takes its snapshot from
    pub tasks: SharedTaskSource,
    /// Association map file
    pub associations: AssociationStore,
}

impl AppState {
    pub fn new(config: Config, tasks: SharedTaskSource) -> Self {
        let associations = AssociationStore::new(config.data_file.clone());
        Self {
            config,
            tasks,
            associations,
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(tasks::list_tasks))
        .route(
            "/most_urgent",
            get(tasks::most_urgent).post(tasks::most_urgent),
        )
        .route("/random", get(tasks::random).post(tasks::random))
        .route("/task", get(tasks::get_task).post(tasks::get_task))
        .route("/dict", get(dict::read_dict).post(dict::write_dict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let source: SharedTaskSource = Arc::new(TaskwarriorSource::new(config.taskwarrior.clone()));
    tracing::info!(
        "Using Taskwarrior binary '{}', association map at {}",
        config.taskwarrior.bin,
        config.data_file.display()
    );

    let state = Arc::new(AppState::new(config.clone(), source));
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
