//! PostgreSQL persistence gateway.

use async_trait::async_trait;
use folio_core::gateway::require_owner;
use folio_core::{Artefact, ArtefactGateway, FolioError, UserId};
use sqlx::PgPool;

use crate::models::{ArtefactRow, ARTEFACT_COLUMNS};

/// Gateway storing artefacts in the `artefacts` table, one owner column per row.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn rejected(operation: &str, e: sqlx::Error) -> FolioError {
    tracing::error!(operation, error = %e, "database rejected artefact query");
    FolioError::Persistence(format!("failed to {} artefact: {}", operation, e))
}

#[async_trait]
impl ArtefactGateway for PgGateway {
    async fn fetch_all(&self, owner: Option<&UserId>) -> folio_core::Result<Vec<Artefact>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };

        let rows: Vec<ArtefactRow> = sqlx::query_as(&format!(
            "SELECT {} FROM artefacts WHERE user_id = $1 ORDER BY created_at DESC",
            ARTEFACT_COLUMNS
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| rejected("fetch", e))?;

        rows.into_iter().map(Artefact::try_from).collect()
    }

    async fn insert(&self, owner: Option<&UserId>, artefact: &Artefact) -> folio_core::Result<()> {
        let owner = require_owner(owner)?;

        sqlx::query(
            r#"
            INSERT INTO artefacts (id, user_id, unit, title, type, link, summary, created_at, reviewed, reviewed_at, review_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(artefact.id())
        .bind(owner.as_uuid())
        .bind(i32::from(artefact.unit()))
        .bind(artefact.title())
        .bind(artefact.kind())
        .bind(artefact.link())
        .bind(artefact.summary())
        .bind(artefact.created_at())
        .bind(artefact.is_reviewed())
        .bind(artefact.reviewed_at())
        .bind(artefact.review_notes())
        .execute(&self.pool)
        .await
        .map_err(|e| rejected("insert", e))?;

        Ok(())
    }

    async fn update(&self, owner: Option<&UserId>, artefact: &Artefact) -> folio_core::Result<()> {
        let owner = require_owner(owner)?;

        let result = sqlx::query(
            r#"
            UPDATE artefacts
            SET title = $3, type = $4, link = $5, summary = $6,
                reviewed = reviewed OR $7,
                reviewed_at = COALESCE(reviewed_at, $8),
                review_notes = $9
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(artefact.id())
        .bind(owner.as_uuid())
        .bind(artefact.title())
        .bind(artefact.kind())
        .bind(artefact.link())
        .bind(artefact.summary())
        .bind(artefact.is_reviewed())
        .bind(artefact.reviewed_at())
        .bind(artefact.review_notes())
        .execute(&self.pool)
        .await
        .map_err(|e| rejected("update", e))?;

        if result.rows_affected() == 0 {
            return Err(FolioError::NotFound(artefact.id()));
        }
        Ok(())
    }
}
