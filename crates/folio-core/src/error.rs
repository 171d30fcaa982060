//! Error types shared by every layer of the portfolio.

use uuid::Uuid;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Failure kinds surfaced by gateways, the collection store and the workflows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FolioError {
    /// A write was attempted without a signed-in user.
    #[error("authentication required: please sign in")]
    AuthenticationRequired,

    /// The backing store rejected a read or write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// An update matched no artefact owned by the current user.
    #[error("artefact not found: {0}")]
    NotFound(Uuid),

    #[error("unit must be between 1 and 12, got {0}")]
    InvalidUnit(i64),

    /// A stored row or payload did not have the expected shape.
    #[error("malformed artefact record: {0}")]
    MalformedRecord(String),

    #[error("no unit selected for the new artefact")]
    NoUnitSelected,
}

impl FolioError {
    /// Convenience constructor for backing-store failures.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedRecord(err.to_string())
    }
}
