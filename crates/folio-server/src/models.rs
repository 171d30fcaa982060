//! Database models for the portfolio backend.

pub mod artefact;

pub use artefact::{ArtefactRow, ARTEFACT_COLUMNS};
