//! Capture and review workflows.
//!
//! A [`CaptureForm`] collects the fields of a new artefact. Submitting it
//! stores the artefact and hands back a [`ReviewSession`] opened on the new
//! record, so reflection notes can be written straight after capture.

use chrono::{DateTime, Utc};

use crate::artefact::{Artefact, ArtefactDraft, DEFAULT_KIND};
use crate::error::{FolioError, Result};
use crate::store::CollectionStore;
use crate::unit::Unit;

/// In-progress values of the capture form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureForm {
    pub unit: Option<Unit>,
    pub title: String,
    pub kind: String,
    pub link: String,
    pub summary: String,
}

impl Default for CaptureForm {
    fn default() -> Self {
        Self {
            unit: None,
            title: String::new(),
            kind: DEFAULT_KIND.to_string(),
            link: String::new(),
            summary: String::new(),
        }
    }
}

impl CaptureForm {
    /// A blank form with the unit preselected.
    pub fn for_unit(unit: Unit) -> Self {
        Self {
            unit: Some(unit),
            ..Self::default()
        }
    }

    /// Discards everything typed so far.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn to_draft(&self) -> Result<ArtefactDraft> {
        let unit = self.unit.ok_or(FolioError::NoUnitSelected)?;
        Ok(ArtefactDraft {
            unit,
            title: self.title.clone(),
            kind: self.kind.clone(),
            link: self.link.clone(),
            summary: self.summary.clone(),
        })
    }

    /// Stores a new artefact built from the form.
    ///
    /// On success the form is cleared and a review session is opened on the
    /// stored artefact. On failure the form keeps its values so the user can
    /// try again.
    pub async fn submit(&mut self, store: &CollectionStore) -> Result<ReviewSession> {
        let artefact = Artefact::create(self.to_draft()?);
        store.create(&artefact).await?;

        self.cancel();
        let stored = store.find(artefact.id()).await.unwrap_or(artefact);
        Ok(ReviewSession::open(stored))
    }
}

/// Result of asking to mark an artefact as reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Reviewed,
    /// The artefact was already reviewed; nothing was written.
    AlreadyReviewed,
}

/// Review of a single artefact with a notes editing buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    artefact: Artefact,
    notes: String,
}

impl ReviewSession {
    pub fn open(artefact: Artefact) -> Self {
        let notes = artefact.review_notes().to_string();
        Self { artefact, notes }
    }

    pub fn artefact(&self) -> &Artefact {
        &self.artefact
    }

    /// Current contents of the notes buffer.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn edit_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Mirrors the disabled "Mark as reviewed" button.
    pub fn can_mark_reviewed(&self) -> bool {
        !self.artefact.is_reviewed()
    }

    /// Persists the notes buffer. The review state is left as it is.
    pub async fn save_notes(&mut self, store: &CollectionStore) -> Result<()> {
        let mut updated = self.artefact.clone();
        updated.set_review_notes(self.notes.clone());
        self.commit(store, updated).await
    }

    /// Marks the artefact reviewed now, saving the buffered notes with it.
    pub async fn mark_reviewed(&mut self, store: &CollectionStore) -> Result<ReviewOutcome> {
        self.mark_reviewed_at(store, Utc::now()).await
    }

    pub async fn mark_reviewed_at(
        &mut self,
        store: &CollectionStore,
        at: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        if !self.can_mark_reviewed() {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }

        let mut updated = self.artefact.clone();
        updated.set_review_notes(self.notes.clone());
        updated.mark_reviewed(at);
        self.commit(store, updated).await?;
        Ok(ReviewOutcome::Reviewed)
    }

    async fn commit(&mut self, store: &CollectionStore, updated: Artefact) -> Result<()> {
        store.save(&updated).await?;
        self.artefact = store.find(updated.id()).await.unwrap_or(updated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_to_design() {
        let form = CaptureForm::default();
        assert_eq!(form.kind, "Design");
        assert_eq!(form.unit, None);
    }

    #[test]
    fn test_draft_requires_unit() {
        let form = CaptureForm::default();
        assert_eq!(form.to_draft(), Err(FolioError::NoUnitSelected));
    }

    #[test]
    fn test_cancel_discards_state() {
        let mut form = CaptureForm::for_unit(Unit::new(4).unwrap());
        form.title = "Threat model".to_string();
        form.kind = "Code".to_string();
        form.cancel();
        assert_eq!(form, CaptureForm::default());
    }

    #[test]
    fn test_review_session_buffers_existing_notes() {
        let form = CaptureForm::for_unit(Unit::new(2).unwrap());
        let mut artefact = Artefact::create(form.to_draft().unwrap());
        artefact.set_review_notes("earlier thoughts");

        let mut session = ReviewSession::open(artefact);
        assert_eq!(session.notes(), "earlier thoughts");
        assert!(session.can_mark_reviewed());

        session.edit_notes("new thoughts");
        assert_eq!(session.notes(), "new thoughts");
        assert_eq!(session.artefact().review_notes(), "earlier thoughts");
    }
}
