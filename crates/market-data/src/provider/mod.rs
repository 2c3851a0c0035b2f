//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Concrete provider implementations (Alpha Vantage)

mod traits;

pub mod alpha_vantage;

pub use traits::MarketDataProvider;
