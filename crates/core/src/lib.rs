//! Stockfeed Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Stockfeed: request validation,
//! the price query service, and the ingestion job. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod ingestion;
pub mod prices;
pub mod utils;
pub mod validation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
