use crate::errors::Result;
use crate::prices::prices_model::{
    ListPriceRecordsRequest, PriceAverages, PriceRecord, PriceRecordFilter,
    PriceRecordListResponse, PriceRecordPage, PriceStatisticsRequest, PriceStatisticsResponse,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for price record repository operations
#[async_trait]
pub trait PriceRecordRepositoryTrait: Send + Sync {
    /// Counts every row matching `filter` and returns the rows in
    /// `[offset, offset + limit)`, newest date first, ties by symbol.
    fn find_price_records(
        &self,
        filter: &PriceRecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<PriceRecordPage>;

    /// `None` when no row matches.
    fn get_price_averages(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<PriceAverages>>;

    /// Inserts or overwrites every record in one transaction.
    async fn upsert_price_records(&self, records: Vec<PriceRecord>) -> Result<usize>;
}

/// Trait for the read-side query operations
pub trait PriceQueryServiceTrait: Send + Sync {
    fn list_price_records(&self, request: ListPriceRecordsRequest)
        -> Result<PriceRecordListResponse>;
    fn get_price_statistics(&self, request: PriceStatisticsRequest)
        -> Result<PriceStatisticsResponse>;
}
