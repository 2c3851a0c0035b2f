//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::DailyBar;

/// Trait for upstream daily price providers.
///
/// Implement this trait to add support for a new market data source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockfeed_market_data::{DailyBar, MarketDataError, MarketDataProvider};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_daily_series(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
///         // call the upstream API
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the most recent daily series the provider offers for `symbol`.
    ///
    /// Bars are ordered by date ascending.
    async fn get_daily_series(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError>;

    /// Fetch daily bars for `symbol` whose date lies in `[start, end]`.
    ///
    /// An empty window is not an error: the symbol exists, it simply had no
    /// trading days in range.
    async fn get_daily_series_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        let bars = self.get_daily_series(symbol).await?;
        Ok(bars
            .into_iter()
            .filter(|bar| bar.is_within(start, end))
            .collect())
    }
}
