use std::sync::Arc;

use crate::config::{Config, LogFormat};
use stockfeed_core::{
    ingestion::{IngestionService, IngestionServiceTrait},
    prices::{PriceQueryService, PriceQueryServiceTrait, PriceRecordRepositoryTrait},
};
use stockfeed_market_data::AlphaVantageProvider;
use stockfeed_storage_sqlite::{db, PriceRecordRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub price_query_service: Arc<dyn PriceQueryServiceTrait>,
    pub price_repository: Arc<dyn PriceRecordRepositoryTrait>,
    /// Absent when no upstream API key is configured.
    pub ingestion_service: Option<Arc<dyn IngestionServiceTrait>>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Wires the ingestion job to the Alpha Vantage provider, or returns `None`
/// without an API key.
pub fn build_ingestion_service(
    config: &Config,
    repository: Arc<dyn PriceRecordRepositoryTrait>,
) -> Option<Arc<dyn IngestionServiceTrait>> {
    let api_key = config.alpha_vantage_api_key.as_ref()?;
    let provider = Arc::new(AlphaVantageProvider::new(api_key.clone()));
    Some(Arc::new(IngestionService::new(
        provider,
        repository,
        config.symbols.clone(),
    )))
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let price_repository: Arc<dyn PriceRecordRepositoryTrait> =
        Arc::new(PriceRecordRepository::new(pool.clone(), writer.clone()));
    let price_query_service = Arc::new(PriceQueryService::new(price_repository.clone()));

    let ingestion_service = build_ingestion_service(config, price_repository.clone());
    if ingestion_service.is_none() {
        tracing::warn!("ALPHAVANTAGE_API_KEY is not set; ingestion is disabled");
    }

    Ok(Arc::new(AppState {
        price_query_service,
        price_repository,
        ingestion_service,
    }))
}
