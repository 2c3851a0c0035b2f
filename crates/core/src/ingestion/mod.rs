//! Ingestion module - pulls recent daily bars from the upstream provider and
//! upserts them into storage.

mod ingestion_model;
mod ingestion_service;
mod ingestion_traits;

#[cfg(test)]
mod ingestion_service_tests;

pub use ingestion_model::{IngestionSummary, SymbolFailure};
pub use ingestion_service::IngestionService;
pub use ingestion_traits::IngestionServiceTrait;
