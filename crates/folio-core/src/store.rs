//! Collection store: the signed-in user's snapshot of artefacts.
//!
//! Writes go straight to the gateway. Nothing is merged optimistically: a
//! successful write invalidates the snapshot and refetches it, a failed write
//! leaves the snapshot exactly as it was. The snapshot is swapped wholesale so
//! readers never observe a half-applied refresh.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::artefact::Artefact;
use crate::error::Result;
use crate::gateway::ArtefactGateway;
use crate::user::UserId;

#[derive(Debug, Clone, Copy)]
enum Write {
    Insert,
    Update,
}

pub struct CollectionStore {
    gateway: Arc<dyn ArtefactGateway>,
    owner: Option<UserId>,
    snapshot: RwLock<Arc<Vec<Artefact>>>,
    stale: AtomicBool,
    refreshes: AtomicU64,
    // In-flight writes per artefact id.
    pending: Mutex<HashMap<Uuid, usize>>,
}

impl CollectionStore {
    /// Creates an empty, stale store. Call [`refresh`](Self::refresh) to load it.
    pub fn new(gateway: Arc<dyn ArtefactGateway>, owner: Option<UserId>) -> Self {
        Self {
            gateway,
            owner,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            stale: AtomicBool::new(true),
            refreshes: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Latest known snapshot, newest first.
    pub async fn current(&self) -> Arc<Vec<Artefact>> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Looks an artefact up in the current snapshot.
    pub async fn find(&self, id: Uuid) -> Option<Artefact> {
        self.snapshot
            .read()
            .await
            .iter()
            .find(|a| a.id() == id)
            .cloned()
    }

    /// Refetches the collection and swaps it in. On failure the snapshot is
    /// left untouched.
    pub async fn refresh(&self) -> Result<()> {
        let artefacts = self
            .gateway
            .fetch_all(self.owner.as_ref())
            .await
            .inspect_err(|e| warn!(error = %e, "failed to refresh artefact snapshot"))?;

        let count = artefacts.len();
        *self.snapshot.write().await = Arc::new(artefacts);
        self.stale.store(false, Ordering::SeqCst);
        let refreshes = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(count, refreshes, "artefact snapshot refreshed");
        Ok(())
    }

    /// Marks the snapshot as out of date with the backing store.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Number of successful refreshes so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Whether a write for this artefact is in flight.
    pub async fn is_saving(&self, id: Uuid) -> bool {
        self.pending.lock().await.contains_key(&id)
    }

    /// Persists a new artefact, then refetches the snapshot.
    pub async fn create(&self, artefact: &Artefact) -> Result<()> {
        self.write(Write::Insert, artefact).await
    }

    /// Persists changes to an existing artefact, then refetches the snapshot.
    pub async fn save(&self, artefact: &Artefact) -> Result<()> {
        self.write(Write::Update, artefact).await
    }

    async fn finish_pending(&self, id: Uuid) {
        let mut pending = self.pending.lock().await;
        if let Some(count) = pending.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                pending.remove(&id);
            }
        }
    }

    async fn write(&self, kind: Write, artefact: &Artefact) -> Result<()> {
        let id = artefact.id();
        *self.pending.lock().await.entry(id).or_insert(0) += 1;

        let outcome = match kind {
            Write::Insert => self.gateway.insert(self.owner.as_ref(), artefact).await,
            Write::Update => self.gateway.update(self.owner.as_ref(), artefact).await,
        };
        self.finish_pending(id).await;

        if let Err(e) = outcome {
            warn!(%id, ?kind, error = %e, "artefact write rejected");
            return Err(e);
        }
        info!(%id, ?kind, unit = %artefact.unit(), "artefact written");

        // The write is committed at this point. A failed refetch leaves the
        // snapshot stale rather than reporting the write as failed.
        self.invalidate();
        if let Err(e) = self.refresh().await {
            warn!(%id, error = %e, "snapshot left stale after write");
        }
        Ok(())
    }
}
