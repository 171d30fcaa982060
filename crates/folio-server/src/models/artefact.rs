//! Row model for the `artefacts` table.

use chrono::{DateTime, Utc};
use folio_core::{Artefact, ArtefactRecord, FolioError, ReviewColumns, ReviewState, Unit};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list selected by every artefact query, in `ArtefactRow` order.
pub const ARTEFACT_COLUMNS: &str = "id, user_id, unit, title, type, link, summary, created_at, \
                                    reviewed, reviewed_at, review_notes";

/// An artefact as stored in PostgreSQL.
#[derive(Debug, Clone, FromRow)]
pub struct ArtefactRow {
    pub id: Uuid,
    /// Owner of the artefact.
    pub user_id: Uuid,
    pub unit: i32,
    pub title: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub link: Option<String>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub reviewed: bool,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: String,
}

impl TryFrom<ArtefactRow> for Artefact {
    type Error = FolioError;

    fn try_from(row: ArtefactRow) -> Result<Self, Self::Error> {
        let unit = Unit::new(i64::from(row.unit)).map_err(|_| {
            FolioError::MalformedRecord(format!("artefact {} has unit {}", row.id, row.unit))
        })?;
        let review = ReviewState::try_from(ReviewColumns {
            reviewed: row.reviewed,
            reviewed_at: row.reviewed_at,
        })
        .map_err(|e| FolioError::MalformedRecord(format!("artefact {}: {}", row.id, e)))?;

        Artefact::try_from(ArtefactRecord {
            id: row.id,
            unit,
            title: row.title,
            kind: row.kind,
            link: row.link,
            summary: row.summary,
            created_at: row.created_at,
            review,
            review_notes: row.review_notes,
        })
    }
}
