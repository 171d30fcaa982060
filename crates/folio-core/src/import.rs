//! Migration of local-only portfolios into a hosted collection.
//!
//! Before accounts existed the portfolio lived in a single JSON array on the
//! student's machine. Those artefacts can be pushed into the signed-in
//! user's collection; ids already present are skipped, so running the import
//! twice is harmless.

use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::artefact::Artefact;
use crate::error::{FolioError, Result};
use crate::store::CollectionStore;

/// What an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Parses a legacy portfolio document (a JSON array of artefacts).
pub fn parse_legacy(json: &str) -> Result<Vec<Artefact>> {
    serde_json::from_str(json).map_err(|e| FolioError::MalformedRecord(e.to_string()))
}

/// Reads a legacy portfolio document from disk.
pub async fn read_legacy(path: &Path) -> Result<Vec<Artefact>> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        FolioError::Persistence(format!("failed to read '{}': {}", path.display(), e))
    })?;
    parse_legacy(&json)
}

/// Inserts every artefact the store does not already hold.
///
/// Stops at the first failed write; artefacts written before it stay written.
pub async fn import_into(store: &CollectionStore, artefacts: Vec<Artefact>) -> Result<ImportReport> {
    store.refresh().await?;
    let mut known: HashSet<_> = store.current().await.iter().map(Artefact::id).collect();
    let mut report = ImportReport::default();

    for artefact in artefacts {
        if !known.insert(artefact.id()) {
            report.skipped += 1;
            continue;
        }
        store.create(&artefact).await?;
        report.imported += 1;
    }

    info!(
        imported = report.imported,
        skipped = report.skipped,
        "legacy portfolio imported"
    );
    Ok(report)
}
