//! One-shot ingestion: fetch the trailing window for every configured symbol,
//! write it, and exit.

use anyhow::Context;
use stockfeed_server::{build_state, config::Config, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let state = build_state(&config).await?;

    let service = state
        .ingestion_service
        .clone()
        .context("ALPHAVANTAGE_API_KEY must be set to run ingestion")?;

    let summary = service.ingest().await?;
    tracing::info!(
        "Upserted {} row(s) for {} symbol(s) in {}..={}",
        summary.rows_upserted,
        summary.symbols_ingested.len(),
        summary.window_start,
        summary.reference_date
    );
    for failure in &summary.failures {
        tracing::warn!("{} was not ingested: {}", failure.symbol, failure.error);
    }
    Ok(())
}
