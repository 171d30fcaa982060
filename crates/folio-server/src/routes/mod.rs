//! API routes for the portfolio server.

pub mod artefacts;
pub mod units;

use axum::{routing::get, Json, Router};
use folio_core::ArtefactGateway;
use serde_json::{json, Value};
use std::sync::Arc;

/// Gateway shared by every handler.
pub type SharedGateway = Arc<dyn ArtefactGateway>;

/// Creates the main API router with all routes mounted.
pub fn create_router(gateway: SharedGateway) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1_routes(gateway))
}

/// Creates the v1 API routes.
fn api_v1_routes(gateway: SharedGateway) -> Router {
    Router::new()
        .nest("/artefacts", artefacts::router(gateway.clone()))
        .nest("/units", units::router(gateway))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
