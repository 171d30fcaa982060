//! Folio Server - hosted artefact backend
//!
//! REST facade over an [`ArtefactGateway`](folio_core::ArtefactGateway):
//! PostgreSQL in production, a local JSON document for single-user setups.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod routes;

pub use error::AppError;
pub use gateway::PgGateway;
pub use routes::create_router;
