use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::ingestion::ingestion_model::IngestionSummary;

#[async_trait]
pub trait IngestionServiceTrait: Send + Sync {
    /// Runs one ingestion for the window ending on the local calendar date.
    async fn ingest(&self) -> Result<IngestionSummary>;

    /// Runs one ingestion for the window ending on `today`.
    async fn ingest_as_of(&self, today: NaiveDate) -> Result<IngestionSummary>;
}
