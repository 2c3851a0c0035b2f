use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::Arc;

use stockfeed_market_data::MarketDataProvider;

use crate::constants::{DEFAULT_SYMBOLS, TRAILING_WINDOW_DAYS};
use crate::errors::Result;
use crate::ingestion::ingestion_model::{IngestionSummary, SymbolFailure};
use crate::ingestion::ingestion_traits::IngestionServiceTrait;
use crate::prices::{PriceRecord, PriceRecordRepositoryTrait};
use crate::utils::time_utils::{local_today, trailing_window};

/// Fetches each configured symbol and writes the trailing window in a single
/// batch.
///
/// A symbol that fails to fetch is skipped and reported in the summary; the
/// run only fails when the write itself fails.
pub struct IngestionService {
    provider: Arc<dyn MarketDataProvider>,
    repository: Arc<dyn PriceRecordRepositoryTrait>,
    symbols: Vec<String>,
    window_days: i64,
}

impl IngestionService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        repository: Arc<dyn PriceRecordRepositoryTrait>,
        symbols: Vec<String>,
    ) -> Self {
        let symbols = if symbols.is_empty() {
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
        } else {
            symbols
        };
        Self {
            provider,
            repository,
            symbols,
            window_days: TRAILING_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

#[async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn ingest(&self) -> Result<IngestionSummary> {
        self.ingest_as_of(local_today()).await
    }

    async fn ingest_as_of(&self, today: NaiveDate) -> Result<IngestionSummary> {
        let (start, end) = trailing_window(today, self.window_days);
        info!(
            "Ingesting {} symbol(s) from {} for {}..={}",
            self.symbols.len(),
            self.provider.id(),
            start,
            end
        );

        let mut records: Vec<PriceRecord> = Vec::new();
        let mut symbols_ingested = Vec::new();
        let mut failures = Vec::new();

        for symbol in &self.symbols {
            match self
                .provider
                .get_daily_series_in_range(symbol, start, end)
                .await
            {
                Ok(bars) => {
                    debug!("{}: {} bar(s) in window", symbol, bars.len());
                    records.extend(bars.into_iter().map(PriceRecord::from));
                    symbols_ingested.push(symbol.clone());
                }
                Err(e) => {
                    warn!(
                        "Skipping {} (transient: {}): {}",
                        symbol,
                        e.is_transient(),
                        e
                    );
                    failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let rows_upserted = if records.is_empty() {
            0
        } else {
            self.repository.upsert_price_records(records).await?
        };

        info!(
            "Ingestion finished: {} row(s) upserted, {} symbol(s) failed",
            rows_upserted,
            failures.len()
        );

        Ok(IngestionSummary {
            reference_date: today,
            window_start: start,
            rows_upserted,
            symbols_ingested,
            failures,
        })
    }
}
