//! Folio Core - artefact data management for the e-portfolio
//!
//! Records, the persistence gateway contract, the per-user collection store,
//! the unit grouping view and the capture/review workflows. Backends live in
//! `folio-server` (PostgreSQL) and `folio-cli` (HTTP); the in-memory and
//! local JSON gateways ship here.

pub mod artefact;
pub mod error;
pub mod gateway;
pub mod grouping;
pub mod import;
pub mod local;
pub mod session;
pub mod store;
pub mod unit;
pub mod user;
pub mod workflow;

pub use artefact::{
    Artefact, ArtefactDraft, ArtefactEdit, ArtefactRecord, ReviewColumns, ReviewState,
    ReviewStatus,
};
pub use error::{FolioError, Result};
pub use gateway::{ArtefactGateway, MemoryGateway};
pub use grouping::{recent, UnitBucket, UnitGrouping, RECENT_LIMIT};
pub use import::ImportReport;
pub use local::LocalGateway;
pub use session::Session;
pub use store::CollectionStore;
pub use unit::{Unit, UNIT_COUNT};
pub use user::UserId;
pub use workflow::{CaptureForm, ReviewOutcome, ReviewSession};
