//! Background scheduler for periodic price ingestion.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use stockfeed_core::ingestion::IngestionServiceTrait;

/// Starts the ingestion loop. The first run happens immediately; a run that
/// outlasts the interval delays the next one rather than overlapping it.
pub fn start_ingestion_scheduler(
    service: Arc<dyn IngestionServiceTrait>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Ingestion scheduler started ({}s interval)", period.as_secs());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_ingestion(service.as_ref()).await;
        }
    })
}

async fn run_scheduled_ingestion(service: &dyn IngestionServiceTrait) {
    match service.ingest().await {
        Ok(summary) if summary.is_complete() => {
            info!(
                "Scheduled ingestion completed: {} row(s) for {:?}",
                summary.rows_upserted, summary.symbols_ingested
            );
        }
        Ok(summary) => {
            let failed: Vec<&str> = summary.failures.iter().map(|f| f.symbol.as_str()).collect();
            warn!(
                "Scheduled ingestion partially completed: {} row(s), failed symbols {:?}",
                summary.rows_upserted, failed
            );
        }
        Err(e) => warn!("Scheduled ingestion failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stockfeed_core::ingestion::IngestionSummary;
    use stockfeed_core::Result;
    use tokio::sync::Notify;

    struct CountingIngestion {
        runs: AtomicUsize,
        ran: Notify,
    }

    #[async_trait]
    impl IngestionServiceTrait for CountingIngestion {
        async fn ingest(&self) -> Result<IngestionSummary> {
            self.ingest_as_of(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap())
                .await
        }

        async fn ingest_as_of(&self, today: NaiveDate) -> Result<IngestionSummary> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.ran.notify_one();
            Ok(IngestionSummary {
                reference_date: today,
                window_start: today,
                rows_upserted: 0,
                symbols_ingested: Vec::new(),
                failures: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_first_run_is_immediate() {
        let service = Arc::new(CountingIngestion {
            runs: AtomicUsize::new(0),
            ran: Notify::new(),
        });

        let handle = start_ingestion_scheduler(service.clone(), Duration::from_secs(3600));
        tokio::time::timeout(Duration::from_secs(5), service.ran.notified())
            .await
            .expect("scheduler did not run");
        handle.abort();

        assert_eq!(service.runs.load(Ordering::SeqCst), 1);
    }
}
