//! Stockfeed Market Data Crate
//!
//! This crate fetches daily price series from upstream market-data providers.
//! It knows nothing about storage; callers receive plain [`DailyBar`] values and
//! decide what to persist.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  Ingestion job   |  (stockfeed-core)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (Alpha Vantage, ...)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    DailyBar      |  (one trading day of OHLCV data)
//! +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::DailyBar;
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::MarketDataProvider;
