//! HTTP surface of EcoAction: one JSON route per flow.

mod config;
mod error;
pub mod routes;

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use ecoaction_core::CompletionClient;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{
    ServerConfig, DEFAULT_ADDR, DEFAULT_MAX_ATTEMPTS, ENV_ADDR, ENV_MAX_ATTEMPTS, MAX_BODY_BYTES,
};
pub use error::{ApiError, ServerError};

/// Shared by every request; holds no mutable state.
#[derive(Clone, Debug)]
pub struct AppState {
    client: CompletionClient,
}

impl AppState {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/analyze-carbon", post(routes::analyze_carbon))
        .route("/api/carbon-suggestions", post(routes::carbon_suggestions))
        .route("/api/carbon-quiz", post(routes::carbon_quiz))
        .route("/api/eco-situation", post(routes::eco_situation))
        .route("/api/word-puzzles", post(routes::word_puzzles))
        .route("/api/eco-story", post(routes::eco_story))
        .route("/api/eco-story/evaluate", post(routes::evaluate_story))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(map_response(json_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The limit layer rejects oversized declared lengths with a plain-text 413;
/// rewrite it to the `{"error": ...}` shape every route uses.
async fn json_payload_too_large(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large().into_response();
    }
    response
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "ecoaction server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
