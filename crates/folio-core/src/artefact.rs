//! Artefact records.
//!
//! An artefact is one piece of evidence (a design, some code, meeting notes,
//! feedback) captured against a course unit. `Artefact` guards the record's
//! invariants: `id`, `unit` and `created_at` are fixed at creation, and the
//! review timestamp is present exactly when the artefact has been reviewed.
//! `ArtefactRecord` is the plain wire shape used for JSON and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::FolioError;
use crate::unit::Unit;

/// Default artefact type offered by the capture form.
pub const DEFAULT_KIND: &str = "Design";

/// Review progress of an artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ReviewColumns", into = "ReviewColumns")]
pub enum ReviewState {
    #[default]
    New,
    Reviewed {
        at: DateTime<Utc>,
    },
}

/// The `reviewed` / `reviewedAt` pair as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewColumns {
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewColumns> for ReviewState {
    type Error = FolioError;

    fn try_from(columns: ReviewColumns) -> Result<Self, Self::Error> {
        match (columns.reviewed, columns.reviewed_at) {
            (false, None) => Ok(Self::New),
            (true, Some(at)) => Ok(Self::Reviewed { at }),
            (true, None) => Err(FolioError::MalformedRecord(
                "reviewed artefact has no reviewedAt".to_string(),
            )),
            (false, Some(_)) => Err(FolioError::MalformedRecord(
                "unreviewed artefact carries a reviewedAt".to_string(),
            )),
        }
    }
}

impl From<ReviewState> for ReviewColumns {
    fn from(state: ReviewState) -> Self {
        match state {
            ReviewState::New => Self {
                reviewed: false,
                reviewed_at: None,
            },
            ReviewState::Reviewed { at } => Self {
                reviewed: true,
                reviewed_at: Some(at),
            },
        }
    }
}

/// Badge shown next to an artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    New,
    Reviewed,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("New"),
            Self::Reviewed => f.write_str("Reviewed"),
        }
    }
}

/// Field values collected for a new artefact, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactDraft {
    pub unit: Unit,
    pub title: String,
    pub kind: String,
    pub link: String,
    pub summary: String,
}

/// Changes to an artefact's descriptive fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtefactEdit {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// A blank link clears it.
    pub link: Option<String>,
    pub summary: Option<String>,
}

/// Wire and storage shape of an artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtefactRecord {
    pub id: Uuid,
    pub unit: Unit,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_link"
    )]
    pub link: Option<String>,
    #[serde(default)]
    pub summary: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub review: ReviewState,
    #[serde(default)]
    pub review_notes: String,
}

fn deserialize_link<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|link| normalize_link(&link)))
}

/// Trims a link; a blank link is absent.
pub fn normalize_link(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trims a title, falling back to the unit placeholder when blank.
pub fn normalize_title(raw: &str, unit: Unit) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        placeholder_title(unit)
    } else {
        trimmed.to_string()
    }
}

/// Title given to artefacts captured without one.
pub fn placeholder_title(unit: Unit) -> String {
    format!("Artefact for Unit {}", unit)
}

/// A single piece of evidence for a course unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ArtefactRecord", into = "ArtefactRecord")]
pub struct Artefact {
    id: Uuid,
    unit: Unit,
    title: String,
    kind: String,
    link: Option<String>,
    summary: String,
    created_at: DateTime<Utc>,
    review: ReviewState,
    review_notes: String,
}

impl Artefact {
    /// Builds a fresh, unreviewed artefact stamped with the current time.
    pub fn create(draft: ArtefactDraft) -> Self {
        Self::create_at(draft, Utc::now())
    }

    /// Builds a fresh, unreviewed artefact with an explicit creation time.
    pub fn create_at(draft: ArtefactDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit: draft.unit,
            title: normalize_title(&draft.title, draft.unit),
            kind: draft.kind,
            link: normalize_link(&draft.link),
            summary: draft.summary,
            created_at,
            review: ReviewState::New,
            review_notes: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text classification ("Design", "Code", "Notes", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn review(&self) -> ReviewState {
        self.review
    }

    pub fn is_reviewed(&self) -> bool {
        matches!(self.review, ReviewState::Reviewed { .. })
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        match self.review {
            ReviewState::New => None,
            ReviewState::Reviewed { at } => Some(at),
        }
    }

    pub fn review_notes(&self) -> &str {
        &self.review_notes
    }

    pub fn status(&self) -> ReviewStatus {
        if self.is_reviewed() {
            ReviewStatus::Reviewed
        } else {
            ReviewStatus::New
        }
    }

    /// One-line description for listings: the summary, or the type when
    /// no summary was written.
    pub fn blurb(&self) -> &str {
        if self.summary.is_empty() {
            &self.kind
        } else {
            &self.summary
        }
    }

    /// Moves a new artefact to reviewed. Returns `false` and leaves the
    /// record untouched when it was already reviewed.
    pub fn mark_reviewed(&mut self, at: DateTime<Utc>) -> bool {
        match self.review {
            ReviewState::Reviewed { .. } => false,
            ReviewState::New => {
                self.review = ReviewState::Reviewed { at };
                true
            }
        }
    }

    pub fn set_review_notes(&mut self, notes: impl Into<String>) {
        self.review_notes = notes.into();
    }

    /// Applies descriptive edits with the same normalisation as creation.
    pub fn apply_edit(&mut self, edit: ArtefactEdit) {
        if let Some(title) = edit.title {
            self.title = normalize_title(&title, self.unit);
        }
        if let Some(kind) = edit.kind {
            self.kind = kind;
        }
        if let Some(link) = edit.link {
            self.link = normalize_link(&link);
        }
        if let Some(summary) = edit.summary {
            self.summary = summary;
        }
    }

    /// Overwrites the mutable fields with those of `other`, the way a stored
    /// row takes an update. `id`, `unit` and `created_at` are kept.
    ///
    /// Review only moves forward: a reviewed artefact keeps its original
    /// `reviewed_at` whatever `other` carries.
    pub fn absorb_update(&mut self, other: &Artefact) {
        self.title = other.title.clone();
        self.kind = other.kind.clone();
        self.link = other.link.clone();
        self.summary = other.summary.clone();
        if self.review == ReviewState::New {
            self.review = other.review;
        }
        self.review_notes = other.review_notes.clone();
    }
}

/// Stored records are taken as they are; a blank title means the record was
/// not written through [`Artefact::create`] and is rejected.
impl TryFrom<ArtefactRecord> for Artefact {
    type Error = FolioError;

    fn try_from(record: ArtefactRecord) -> Result<Self, Self::Error> {
        if record.title.trim().is_empty() {
            return Err(FolioError::MalformedRecord(format!(
                "artefact {} has a blank title",
                record.id
            )));
        }
        Ok(Self {
            id: record.id,
            unit: record.unit,
            title: record.title,
            kind: record.kind,
            link: record.link.as_deref().and_then(normalize_link),
            summary: record.summary,
            created_at: record.created_at,
            review: record.review,
            review_notes: record.review_notes,
        })
    }
}

impl From<Artefact> for ArtefactRecord {
    fn from(artefact: Artefact) -> Self {
        Self {
            id: artefact.id,
            unit: artefact.unit,
            title: artefact.title,
            kind: artefact.kind,
            link: artefact.link,
            summary: artefact.summary,
            created_at: artefact.created_at,
            review: artefact.review,
            review_notes: artefact.review_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(unit: i64, title: &str, link: &str) -> ArtefactDraft {
        ArtefactDraft {
            unit: Unit::new(unit).unwrap(),
            title: title.to_string(),
            kind: "Design".to_string(),
            link: link.to_string(),
            summary: "draft".to_string(),
        }
    }

    #[test]
    fn test_blank_title_and_link_are_normalized() {
        let artefact = Artefact::create(draft(3, "", "  "));
        assert_eq!(artefact.title(), "Artefact for Unit 3");
        assert_eq!(artefact.link(), None);
        assert_eq!(artefact.kind(), "Design");
        assert_eq!(artefact.summary(), "draft");
    }

    #[test]
    fn test_title_and_link_are_trimmed() {
        let artefact = Artefact::create(draft(5, "  Threat Model  ", " https://example.com/tm "));
        assert_eq!(artefact.title(), "Threat Model");
        assert_eq!(artefact.link(), Some("https://example.com/tm"));
    }

    #[test]
    fn test_new_artefact_is_unreviewed() {
        let artefact = Artefact::create(draft(1, "Notes", ""));
        assert!(!artefact.is_reviewed());
        assert_eq!(artefact.reviewed_at(), None);
        assert_eq!(artefact.review_notes(), "");
        assert_eq!(artefact.status(), ReviewStatus::New);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Artefact::create(draft(1, "a", ""));
        let b = Artefact::create(draft(1, "a", ""));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_mark_reviewed_keeps_first_timestamp() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        let mut artefact = Artefact::create(draft(2, "Code review", ""));

        assert!(artefact.mark_reviewed(first));
        assert!(!artefact.mark_reviewed(second));
        assert_eq!(artefact.reviewed_at(), Some(first));
        assert_eq!(artefact.status(), ReviewStatus::Reviewed);
    }

    #[test]
    fn test_notes_do_not_touch_review_state() {
        let mut artefact = Artefact::create(draft(2, "Code review", ""));
        artefact.set_review_notes("needs more detail");
        assert!(!artefact.is_reviewed());
        assert_eq!(artefact.review_notes(), "needs more detail");
    }

    #[test]
    fn test_absorb_update_only_moves_review_forward() {
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let unreviewed = Artefact::create(draft(8, "Test plan", ""));

        let mut stored = unreviewed.clone();
        let mut reviewed = unreviewed.clone();
        reviewed.mark_reviewed(first);
        stored.absorb_update(&reviewed);
        assert_eq!(stored.reviewed_at(), Some(first));

        stored.absorb_update(&unreviewed);
        assert_eq!(stored.review(), ReviewState::Reviewed { at: first });

        let mut restamped = unreviewed;
        restamped.mark_reviewed(later);
        restamped.set_review_notes("second look");
        stored.absorb_update(&restamped);
        assert_eq!(stored.reviewed_at(), Some(first));
        assert_eq!(stored.review_notes(), "second look");
    }

    #[test]
    fn test_apply_edit_normalizes() {
        let mut artefact = Artefact::create(draft(4, "Old", "https://a.example"));
        let before = artefact.clone();
        artefact.apply_edit(ArtefactEdit {
            title: Some("   ".to_string()),
            kind: None,
            link: Some(" ".to_string()),
            summary: Some("rewritten".to_string()),
        });
        assert_eq!(artefact.title(), "Artefact for Unit 4");
        assert_eq!(artefact.link(), None);
        assert_eq!(artefact.summary(), "rewritten");
        assert_eq!(artefact.kind(), before.kind());
        assert_eq!(artefact.id(), before.id());
        assert_eq!(artefact.unit(), before.unit());
        assert_eq!(artefact.created_at(), before.created_at());
    }

    #[test]
    fn test_blurb_falls_back_to_type() {
        let mut d = draft(6, "Sketch", "");
        d.summary = String::new();
        let artefact = Artefact::create(d);
        assert_eq!(artefact.blurb(), "Design");
    }

    #[test]
    fn test_serialization_shape() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap();
        let mut artefact = Artefact::create_at(draft(3, "Plan", ""), at);
        let json = serde_json::to_value(&artefact).unwrap();
        assert_eq!(json["unit"], 3);
        assert_eq!(json["type"], "Design");
        assert_eq!(json["reviewed"], false);
        assert_eq!(json["reviewNotes"], "");
        assert!(json.get("link").is_none());
        assert!(json.get("reviewedAt").is_none());

        artefact.mark_reviewed(at);
        let json = serde_json::to_value(&artefact).unwrap();
        assert_eq!(json["reviewed"], true);
        assert_eq!(json["reviewedAt"], "2025-01-15T10:30:00Z");
    }

    #[test]
    fn test_deserialize_legacy_shape() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "unit": 2,
            "title": "Risk register",
            "type": "Notes",
            "link": "",
            "summary": "first pass",
            "createdAt": "2024-11-02T08:00:00.000Z"
        }"#;
        let artefact: Artefact = serde_json::from_str(json).unwrap();
        assert_eq!(artefact.unit().number(), 2);
        assert_eq!(artefact.link(), None);
        assert!(!artefact.is_reviewed());
        assert_eq!(artefact.review_notes(), "");
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_review() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "unit": 2,
            "title": "Risk register",
            "type": "Notes",
            "summary": "",
            "createdAt": "2024-11-02T08:00:00Z",
            "reviewed": true
        }"#;
        assert!(serde_json::from_str::<Artefact>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_blank_title() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "unit": 2,
            "title": "  ",
            "type": "Notes",
            "summary": "",
            "createdAt": "2024-11-02T08:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Artefact>(json).is_err());

        let mut record = ArtefactRecord::from(Artefact::create(draft(2, "Kept", "")));
        record.title = String::new();
        assert!(matches!(
            Artefact::try_from(record),
            Err(FolioError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_unit_out_of_range() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "unit": 13,
            "title": "x",
            "type": "Notes",
            "summary": "",
            "createdAt": "2024-11-02T08:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Artefact>(json).is_err());
    }
}
