//! Persistence gateway contract and the in-memory implementation.
//!
//! A gateway reads and writes the artefacts owned by one user. Every
//! implementation follows the same rules:
//!
//! * `fetch_all` without an owner is the signed-out steady state and yields an
//!   empty collection, never an error.
//! * `insert` and `update` without an owner fail with
//!   [`FolioError::AuthenticationRequired`] before touching the backing store.
//! * `update` writes only the mutable fields and only for a row owned by the
//!   caller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::artefact::Artefact;
use crate::error::{FolioError, Result};
use crate::user::UserId;

#[async_trait]
pub trait ArtefactGateway: Send + Sync {
    /// All artefacts owned by `owner`, newest first.
    async fn fetch_all(&self, owner: Option<&UserId>) -> Result<Vec<Artefact>>;

    /// Persists a new artefact for `owner`.
    async fn insert(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()>;

    /// Persists the mutable fields of an existing artefact owned by `owner`.
    async fn update(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()>;
}

/// Rejects writes made without a signed-in user.
pub fn require_owner(owner: Option<&UserId>) -> Result<&UserId> {
    owner.ok_or(FolioError::AuthenticationRequired)
}

/// Orders a collection newest first. Artefacts created at the same instant
/// keep their relative order.
pub fn sort_newest_first(artefacts: &mut [Artefact]) {
    artefacts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Gateway keeping everything in process memory.
///
/// Used for ephemeral sessions and tests; the `fail_next_*` switches make the
/// next matching call fail with a persistence error.
#[derive(Default)]
pub struct MemoryGateway {
    collections: RwLock<HashMap<UserId, Vec<Artefact>>>,
    fail_fetch: AtomicBool,
    fail_insert: AtomicBool,
    fail_update: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_insert(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    /// Number of artefacts stored for `owner`.
    pub async fn len_for(&self, owner: &UserId) -> usize {
        self.collections
            .read()
            .await
            .get(owner)
            .map_or(0, Vec::len)
    }

    fn take_fault(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.swap(false, Ordering::SeqCst) {
            Err(FolioError::Persistence(format!(
                "simulated backing-store failure during {}",
                operation
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ArtefactGateway for MemoryGateway {
    async fn fetch_all(&self, owner: Option<&UserId>) -> Result<Vec<Artefact>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        Self::take_fault(&self.fail_fetch, "fetch")?;

        let mut artefacts = self
            .collections
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default();
        sort_newest_first(&mut artefacts);
        Ok(artefacts)
    }

    async fn insert(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()> {
        let owner = require_owner(owner)?;
        Self::take_fault(&self.fail_insert, "insert")?;

        let mut collections = self.collections.write().await;
        let duplicate = collections
            .values()
            .flatten()
            .any(|existing| existing.id() == artefact.id());
        if duplicate {
            return Err(FolioError::Persistence(format!(
                "duplicate artefact id {}",
                artefact.id()
            )));
        }
        collections.entry(*owner).or_default().push(artefact.clone());
        Ok(())
    }

    async fn update(&self, owner: Option<&UserId>, artefact: &Artefact) -> Result<()> {
        let owner = require_owner(owner)?;
        Self::take_fault(&self.fail_update, "update")?;

        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(owner)
            .and_then(|items| items.iter_mut().find(|a| a.id() == artefact.id()))
            .ok_or(FolioError::NotFound(artefact.id()))?;
        stored.absorb_update(artefact);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::{ArtefactDraft, ArtefactEdit};
    use crate::unit::Unit;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn artefact(unit: i64, title: &str) -> Artefact {
        Artefact::create(ArtefactDraft {
            unit: Unit::new(unit).unwrap(),
            title: title.to_string(),
            kind: "Code".to_string(),
            link: String::new(),
            summary: String::new(),
        })
    }

    #[tokio::test]
    async fn test_fetch_without_owner_is_empty() {
        let gateway = MemoryGateway::new();
        assert!(gateway.fetch_all(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_without_owner_are_rejected() {
        let gateway = MemoryGateway::new();
        let a = artefact(1, "a");
        assert_eq!(
            gateway.insert(None, &a).await,
            Err(FolioError::AuthenticationRequired)
        );
        assert_eq!(
            gateway.update(None, &a).await,
            Err(FolioError::AuthenticationRequired)
        );
    }

    #[tokio::test]
    async fn test_collections_are_scoped_by_owner() {
        let gateway = MemoryGateway::new();
        let alice = UserId::new(Uuid::new_v4());
        let bob = UserId::new(Uuid::new_v4());
        let a = artefact(1, "alice's");

        gateway.insert(Some(&alice), &a).await.unwrap();

        assert_eq!(gateway.fetch_all(Some(&alice)).await.unwrap().len(), 1);
        assert!(gateway.fetch_all(Some(&bob)).await.unwrap().is_empty());
        assert_eq!(
            gateway.update(Some(&bob), &a).await,
            Err(FolioError::NotFound(a.id()))
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let gateway = MemoryGateway::new();
        let owner = UserId::new(Uuid::new_v4());
        let a = artefact(1, "a");
        gateway.insert(Some(&owner), &a).await.unwrap();
        assert!(matches!(
            gateway.insert(Some(&owner), &a).await,
            Err(FolioError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_orders_newest_first() {
        let gateway = MemoryGateway::new();
        let owner = UserId::new(Uuid::new_v4());
        let now = Utc::now();
        let draft = |title: &str| ArtefactDraft {
            unit: Unit::new(2).unwrap(),
            title: title.to_string(),
            kind: "Notes".to_string(),
            link: String::new(),
            summary: String::new(),
        };
        let older = Artefact::create_at(draft("older"), now - Duration::hours(2));
        let newer = Artefact::create_at(draft("newer"), now);

        gateway.insert(Some(&owner), &older).await.unwrap();
        gateway.insert(Some(&owner), &newer).await.unwrap();

        let titles: Vec<String> = gateway
            .fetch_all(Some(&owner))
            .await
            .unwrap()
            .iter()
            .map(|a| a.title().to_string())
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_update_writes_mutable_fields() {
        let gateway = MemoryGateway::new();
        let owner = UserId::new(Uuid::new_v4());
        let mut a = artefact(4, "before");
        gateway.insert(Some(&owner), &a).await.unwrap();

        a.apply_edit(ArtefactEdit {
            title: Some("after".to_string()),
            ..ArtefactEdit::default()
        });
        a.set_review_notes("looks good");
        gateway.update(Some(&owner), &a).await.unwrap();

        let stored = gateway.fetch_all(Some(&owner)).await.unwrap();
        assert_eq!(stored, vec![a]);
    }

    #[tokio::test]
    async fn test_update_cannot_undo_or_restamp_review() {
        let gateway = MemoryGateway::new();
        let owner = UserId::new(Uuid::new_v4());
        let unreviewed = artefact(6, "Sitemap");
        gateway.insert(Some(&owner), &unreviewed).await.unwrap();

        let first = Utc::now() - Duration::days(30);
        let mut reviewed = unreviewed.clone();
        reviewed.mark_reviewed(first);
        gateway.update(Some(&owner), &reviewed).await.unwrap();

        // A stale copy from before the review must not clear it.
        let mut stale = unreviewed.clone();
        stale.set_review_notes("late notes");
        gateway.update(Some(&owner), &stale).await.unwrap();
        let stored = gateway.fetch_all(Some(&owner)).await.unwrap();
        assert_eq!(stored[0].reviewed_at(), Some(first));
        assert_eq!(stored[0].review_notes(), "late notes");

        // A copy reviewed at another time must not move the timestamp.
        let mut restamped = unreviewed;
        restamped.mark_reviewed(Utc::now());
        gateway.update(Some(&owner), &restamped).await.unwrap();
        let stored = gateway.fetch_all(Some(&owner)).await.unwrap();
        assert_eq!(stored[0].reviewed_at(), Some(first));
    }

    #[tokio::test]
    async fn test_injected_fault_fires_once() {
        let gateway = MemoryGateway::new();
        let owner = UserId::new(Uuid::new_v4());
        gateway.fail_next_fetch();
        assert!(gateway.fetch_all(Some(&owner)).await.is_err());
        assert!(gateway.fetch_all(Some(&owner)).await.is_ok());
    }
}
