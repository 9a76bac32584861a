//! Webhook server using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::bot::{Activity, Orchestrator, OutgoingMessage};
use crate::error::{Error, Result};

/// Body returned for every handled activity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepliesBody {
    pub replies: Vec<OutgoingMessage>,
}

pub struct BotServer {
    orchestrator: Arc<Orchestrator>,
}

impl BotServer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Create an axum Router for the server
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/messages", post(handle_messages))
            .route("/health", get(handle_health))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.orchestrator))
    }

    /// Start the server on the given address
    pub async fn serve(self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("PMKB bot listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("PMKB bot stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn handle_messages(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(activity): Json<Activity>,
) -> impl IntoResponse {
    match orchestrator.handle_activity(&activity).await {
        Ok(replies) => (StatusCode::OK, Json(json!(RepliesBody { replies }))),
        Err(e) => {
            warn!("Rejected activity: {}", e);
            let status = match e {
                Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": e.to_string() })))
        }
    }
}

async fn handle_health(State(orchestrator): State<Arc<Orchestrator>>) -> impl IntoResponse {
    if orchestrator.gateway().is_alive().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
