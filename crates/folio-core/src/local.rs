//! Local-only storage: one JSON document on disk.
//!
//! The document maps each user id to that user's artefacts. Every write
//! rewrites the whole document through a uniquely named temporary file and a
//! rename, so a crash mid-write leaves the previous version in place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::artefact::Artefact;
use crate::error::{FolioError, Result};
use crate::gateway::{require_owner, sort_newest_first, ArtefactGateway};
use crate::user::UserId;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalDocument {
    version: u32,
    #[serde(default)]
    collections: BTreeMap<UserId, Vec<Artefact>>,
}

/// Gateway backed by a JSON file.
pub struct LocalGateway {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<LocalDocument> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LocalDocument {
                    version: DOCUMENT_VERSION,
                    collections: BTreeMap::new(),
                })
            }
            Err(e) => {
                return Err(FolioError::Persistence(format!(
                    "failed to read '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let document: LocalDocument = serde_json::from_slice(&bytes).map_err(|e| {
            FolioError::MalformedRecord(format!("'{}': {}", self.path.display(), e))
        })?;
        if document.version != DOCUMENT_VERSION {
            return Err(FolioError::MalformedRecord(format!(
                "'{}' has unsupported version {}",
                self.path.display(),
                document.version
            )));
        }
        Ok(document)
    }

    async fn store(&self, document: &LocalDocument) -> Result<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_document(&path, &json))
            .await
            .map_err(FolioError::persistence)?
    }
}

/// Writes `bytes` to a uniquely named temporary file next to `path`, then
/// renames it over `path`.
fn replace_document(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(FolioError::persistence)?;

    let write_failed = |e: std::io::Error| {
        FolioError::Persistence(format!("failed to write '{}': {}", path.display(), e))
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| {
        FolioError::Persistence(format!(
            "failed to replace '{}': {}",
            path.display(),
            e.error
        ))
    })?;
    Ok(())
}

#[async_trait]
impl ArtefactGateway for LocalGateway {
    async fn fetch_all(&self, owner: Option<&UserId>) -> Result<Vec<Artefact>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let mut artefacts = document.collections.remove(owner).unwrap_or_default();
        sort_newest_first(&mut artefacts);
        Ok(artefacts)
    }

    async fn insert(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()> {
        let owner = require_owner(owner)?;
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        if document
            .collections
            .values()
            .flatten()
            .any(|existing| existing.id() == artefact.id())
        {
            return Err(FolioError::Persistence(format!(
                "duplicate artefact id {}",
                artefact.id()
            )));
        }
        document
            .collections
            .entry(*owner)
            .or_default()
            .push(artefact.clone());
        self.store(&document).await?;
        tracing::debug!(path = %self.path.display(), id = %artefact.id(), "artefact written locally");
        Ok(())
    }

    async fn update(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()> {
        let owner = require_owner(owner)?;
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let stored = document
            .collections
            .get_mut(owner)
            .and_then(|items| items.iter_mut().find(|a| a.id() == artefact.id()))
            .ok_or(FolioError::NotFound(artefact.id()))?;
        stored.absorb_update(artefact);
        self.store(&document).await
    }
}
