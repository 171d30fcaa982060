//! Per-user session state.

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::gateway::ArtefactGateway;
use crate::grouping::UnitGrouping;
use crate::store::CollectionStore;
use crate::user::UserId;

/// Everything a signed-in (or signed-out) user works with: the identity the
/// authentication provider handed over and that user's collection store.
///
/// Build one at sign-in with [`Session::start`] and drop it with
/// [`Session::end`] at sign-out.
pub struct Session {
    store: CollectionStore,
}

impl Session {
    /// Opens a session and loads the initial snapshot.
    pub async fn start(user: Option<UserId>, gateway: Arc<dyn ArtefactGateway>) -> Result<Self> {
        let store = CollectionStore::new(gateway, user);
        store.refresh().await?;
        match user {
            Some(user) => info!(%user, "session started"),
            None => info!("session started without a signed-in user"),
        }
        Ok(Self { store })
    }

    pub fn user(&self) -> Option<&UserId> {
        self.store.owner()
    }

    pub fn is_signed_in(&self) -> bool {
        self.store.owner().is_some()
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Unit view of the current snapshot.
    pub async fn grouping(&self) -> UnitGrouping {
        UnitGrouping::from_artefacts(&self.store.current().await)
    }

    /// Tears the session down.
    pub fn end(self) {
        if let Some(user) = self.store.owner() {
            info!(%user, "session ended");
        }
    }
}
