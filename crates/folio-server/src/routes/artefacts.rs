//! Artefact endpoints.
//!
//! These are the persistence boundary for clients: records arrive fully
//! formed (ids and timestamps are generated by the capture workflow on the
//! client) and are stored under the calling user's id.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use folio_core::{recent, Artefact, FolioError, RECENT_LIMIT};
use serde::Deserialize;
use uuid::Uuid;

use super::SharedGateway;
use crate::auth::Caller;
use crate::error::AppError;

/// Upper bound for `?limit=` on the recent listing.
const MAX_RECENT_LIMIT: usize = 50;

/// Creates the artefacts router.
pub fn router(gateway: SharedGateway) -> Router {
    Router::new()
        .route("/", get(list_artefacts).post(create_artefact))
        .route("/recent", get(recent_artefacts))
        .route("/{id}", put(update_artefact))
        .with_state(gateway)
}

/// Query parameters for the recent listing.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/artefacts
///
/// Returns the caller's artefacts, newest first. Signed-out callers get an
/// empty list.
async fn list_artefacts(
    State(gateway): State<SharedGateway>,
    caller: Caller,
) -> Result<Json<Vec<Artefact>>, AppError> {
    let artefacts = gateway.fetch_all(caller.user()).await?;
    Ok(Json(artefacts))
}

/// GET /api/v1/artefacts/recent?limit=5
async fn recent_artefacts(
    State(gateway): State<SharedGateway>,
    caller: Caller,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Artefact>>, AppError> {
    let limit = query.limit.unwrap_or(RECENT_LIMIT).min(MAX_RECENT_LIMIT);
    let artefacts = gateway.fetch_all(caller.user()).await?;
    Ok(Json(recent(&artefacts, limit).to_vec()))
}

/// POST /api/v1/artefacts
///
/// Stores a new artefact for the caller. Returns 201 with the stored record.
async fn create_artefact(
    State(gateway): State<SharedGateway>,
    caller: Caller,
    Json(artefact): Json<Artefact>,
) -> Result<(StatusCode, Json<Artefact>), AppError> {
    gateway.insert(caller.user(), &artefact).await?;
    tracing::info!(id = %artefact.id(), unit = %artefact.unit(), "artefact created");
    Ok((StatusCode::CREATED, Json(artefact)))
}

/// PUT /api/v1/artefacts/{id}
///
/// Writes the mutable fields of one of the caller's artefacts and returns the
/// stored record.
async fn update_artefact(
    State(gateway): State<SharedGateway>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(artefact): Json<Artefact>,
) -> Result<Json<Artefact>, AppError> {
    if artefact.id() != id {
        return Err(AppError::BadRequest(format!(
            "Body id {} does not match path id {}",
            artefact.id(),
            id
        )));
    }

    gateway.update(caller.user(), &artefact).await?;
    tracing::info!(%id, reviewed = artefact.is_reviewed(), "artefact updated");

    let stored = gateway
        .fetch_all(caller.user())
        .await?
        .into_iter()
        .find(|a| a.id() == id)
        .ok_or(FolioError::NotFound(id))?;
    Ok(Json(stored))
}
