//! Tests for IngestionService window filtering and failure isolation.

#[cfg(test)]
mod tests {
    use crate::errors::{DatabaseError, Error, Result};
    use crate::ingestion::{IngestionService, IngestionServiceTrait};
    use crate::prices::{
        PriceAverages, PriceRecord, PriceRecordFilter, PriceRecordPage, PriceRecordRepositoryTrait,
    };
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use stockfeed_market_data::{DailyBar, MarketDataError, MarketDataProvider};

    // =========================================================================
    // Mock provider
    // =========================================================================

    /// Serves 30 consecutive days ending 2023-02-14 for known symbols.
    struct MockProvider {
        known: Vec<&'static str>,
        rate_limited: Vec<&'static str>,
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn get_daily_series(&self, symbol: &str) -> std::result::Result<Vec<DailyBar>, MarketDataError> {
            if self.rate_limited.contains(&symbol) {
                return Err(MarketDataError::RateLimited {
                    provider: "MOCK".to_string(),
                });
            }
            if !self.known.contains(&symbol) {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            let last = ymd(2023, 2, 14);
            Ok((0..30)
                .rev()
                .map(|i| DailyBar {
                    symbol: symbol.to_string(),
                    date: last - Duration::days(i),
                    open: dec!(100),
                    high: dec!(102),
                    low: dec!(99),
                    close: dec!(101),
                    volume: 1_000,
                })
                .collect())
        }
    }

    // =========================================================================
    // Mock repository keyed by (symbol, date)
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockPriceRepository {
        rows: Arc<Mutex<HashMap<(String, NaiveDate), PriceRecord>>>,
        batches: Arc<Mutex<usize>>,
        fail_on_write: bool,
    }

    #[async_trait]
    impl PriceRecordRepositoryTrait for MockPriceRepository {
        fn find_price_records(
            &self,
            _filter: &PriceRecordFilter,
            _limit: i64,
            _offset: i64,
        ) -> Result<PriceRecordPage> {
            Ok(PriceRecordPage::default())
        }

        fn get_price_averages(
            &self,
            _symbol: &str,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Option<PriceAverages>> {
            Ok(None)
        }

        async fn upsert_price_records(&self, records: Vec<PriceRecord>) -> Result<usize> {
            if self.fail_on_write {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "database is locked".to_string(),
                )));
            }
            *self.batches.lock().unwrap() += 1;
            let count = records.len();
            let mut rows = self.rows.lock().unwrap();
            for record in records {
                rows.insert((record.symbol.clone(), record.date), record);
            }
            Ok(count)
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_ingest_keeps_inclusive_trailing_window() {
        let repo = MockPriceRepository::default();
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM", "AAPL"],
                rate_limited: vec![],
            }),
            Arc::new(repo.clone()),
            symbols(&["IBM", "AAPL"]),
        );

        let summary = service.ingest_as_of(ymd(2023, 2, 14)).await.unwrap();

        // 2023-01-31..=2023-02-14 is 15 calendar days per symbol.
        assert_eq!(summary.rows_upserted, 30);
        assert_eq!(summary.window_start, ymd(2023, 1, 31));
        assert_eq!(summary.symbols_ingested, symbols(&["IBM", "AAPL"]));
        assert!(summary.is_complete());
        assert_eq!(*repo.batches.lock().unwrap(), 1);

        let rows = repo.rows.lock().unwrap();
        assert!(rows.contains_key(&("IBM".to_string(), ymd(2023, 1, 31))));
        assert!(!rows.contains_key(&("IBM".to_string(), ymd(2023, 1, 30))));
    }

    #[tokio::test]
    async fn test_custom_window_narrows_the_batch() {
        let repo = MockPriceRepository::default();
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM"],
                rate_limited: vec![],
            }),
            Arc::new(repo.clone()),
            symbols(&["IBM"]),
        )
        .with_window_days(3);

        let summary = service.ingest_as_of(ymd(2023, 2, 14)).await.unwrap();

        assert_eq!(summary.window_start, ymd(2023, 2, 11));
        assert_eq!(summary.rows_upserted, 4);
        let rows = repo.rows.lock().unwrap();
        assert!(rows.contains_key(&("IBM".to_string(), ymd(2023, 2, 11))));
        assert!(!rows.contains_key(&("IBM".to_string(), ymd(2023, 2, 10))));
    }

    #[tokio::test]
    async fn test_failed_symbol_does_not_stop_the_run() {
        let repo = MockPriceRepository::default();
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM", "AAPL"],
                rate_limited: vec!["AAPL"],
            }),
            Arc::new(repo.clone()),
            symbols(&["NOPE", "AAPL", "IBM"]),
        );

        let summary = service.ingest_as_of(ymd(2023, 2, 14)).await.unwrap();

        assert_eq!(summary.symbols_ingested, symbols(&["IBM"]));
        assert_eq!(summary.rows_upserted, 15);
        let failed: Vec<&str> = summary.failures.iter().map(|f| f.symbol.as_str()).collect();
        assert_eq!(failed, vec!["NOPE", "AAPL"]);
        assert_eq!(summary.failures[0].error, "Symbol not found: NOPE");
    }

    #[tokio::test]
    async fn test_rerun_overwrites_instead_of_duplicating() {
        let repo = MockPriceRepository::default();
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM"],
                rate_limited: vec![],
            }),
            Arc::new(repo.clone()),
            symbols(&["IBM"]),
        );

        service.ingest_as_of(ymd(2023, 2, 14)).await.unwrap();
        service.ingest_as_of(ymd(2023, 2, 14)).await.unwrap();

        assert_eq!(repo.rows.lock().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_nothing_to_write_skips_storage() {
        let repo = MockPriceRepository::default();
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM"],
                rate_limited: vec![],
            }),
            Arc::new(repo.clone()),
            symbols(&["IBM"]),
        );

        let summary = service.ingest_as_of(ymd(2024, 6, 1)).await.unwrap();

        assert_eq!(summary.rows_upserted, 0);
        assert_eq!(summary.symbols_ingested, symbols(&["IBM"]));
        assert_eq!(*repo.batches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_fails_the_run() {
        let repo = MockPriceRepository {
            fail_on_write: true,
            ..MockPriceRepository::default()
        };
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec!["IBM"],
                rate_limited: vec![],
            }),
            Arc::new(repo),
            symbols(&["IBM"]),
        );

        let result = service.ingest_as_of(ymd(2023, 2, 14)).await;
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[test]
    fn test_empty_symbol_list_falls_back_to_defaults() {
        let service = IngestionService::new(
            Arc::new(MockProvider {
                known: vec![],
                rate_limited: vec![],
            }),
            Arc::new(MockPriceRepository::default()),
            Vec::new(),
        );
        assert_eq!(service.symbols(), &["IBM".to_string(), "AAPL".to_string()]);
    }
}
