//! Unit overview endpoint.

use axum::{extract::State, routing::get, Json, Router};
use folio_core::{Artefact, UnitBucket, UnitGrouping};
use serde::Serialize;

use super::SharedGateway;
use crate::auth::Caller;
use crate::error::AppError;

/// Response entry for one course unit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub unit: u8,
    pub total: usize,
    pub reviewed: usize,
    pub artefacts: Vec<Artefact>,
}

impl From<&UnitBucket> for UnitSummary {
    fn from(bucket: &UnitBucket) -> Self {
        Self {
            unit: bucket.unit.number(),
            total: bucket.total(),
            reviewed: bucket.reviewed_count(),
            artefacts: bucket.artefacts.clone(),
        }
    }
}

/// Creates the units router.
pub fn router(gateway: SharedGateway) -> Router {
    Router::new()
        .route("/", get(list_units))
        .with_state(gateway)
}

/// GET /api/v1/units
///
/// Returns all twelve units in order with their artefacts and review counts.
async fn list_units(
    State(gateway): State<SharedGateway>,
    caller: Caller,
) -> Result<Json<Vec<UnitSummary>>, AppError> {
    let artefacts = gateway.fetch_all(caller.user()).await?;
    let grouping = UnitGrouping::from_artefacts(&artefacts);
    Ok(Json(grouping.iter().map(UnitSummary::from).collect()))
}
