//! Alpha Vantage market data provider implementation.
//!
//! Equities are fetched through the TIME_SERIES_DAILY endpoint. The parser
//! also understands the TIME_SERIES_DAILY_ADJUSTED payload, whose volume
//! field is numbered differently.
//!
//! Note: Alpha Vantage free tier is limited to 25 API calls per day.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::DailyBar;
use crate::provider::MarketDataProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";

/// Alpha Vantage daily time series provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// TIME_SERIES_DAILY / TIME_SERIES_DAILY_ADJUSTED response for equities
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    // The adjusted series inserts "5. adjusted close" and shifts volume to 6.
    #[serde(rename = "5. volume", alias = "6. volume")]
    volume: String,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));
        all_params.push(("datatype", "json"));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    /// Check for API-level errors in the response.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(ref msg) = error_message {
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(msg.clone()));
            }
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        // "Note" usually indicates rate limiting
        if let Some(ref msg) = note {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage note: {}", msg);
        }

        if let Some(ref msg) = information {
            if msg.contains("API call frequency")
                || msg.contains("rate limit")
                || msg.contains("premium")
            {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage info: {}", msg);
        }

        Ok(())
    }

    /// Parse a date string in YYYY-MM-DD format.
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
    }

    /// Parse a decimal value from a string.
    fn parse_decimal(s: &str) -> Option<Decimal> {
        Decimal::from_str(s.trim()).ok()
    }

    /// Parse a share volume. Volumes are integral, but some payloads carry a
    /// trailing ".0000".
    fn parse_volume(s: &str) -> Option<i64> {
        let trimmed = s.trim();
        trimmed.parse::<i64>().ok().or_else(|| {
            Decimal::from_str(trimmed)
                .ok()
                .filter(|d| d.fract().is_zero())
                .and_then(|d| i64::try_from(d).ok())
        })
    }

    /// Turn a raw response body into daily bars ordered by date ascending.
    ///
    /// Entries whose fields cannot be parsed are skipped; an error indicator
    /// anywhere in the payload fails the whole symbol.
    fn parse_time_series(symbol: &str, text: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        let response: TimeSeriesResponse =
            serde_json::from_str(text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let time_series = response.time_series.ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("No data for symbol: {}", symbol))
        })?;

        let total = time_series.len();
        let mut bars: Vec<DailyBar> = time_series
            .into_iter()
            .filter_map(|(date_str, daily)| {
                Some(DailyBar {
                    symbol: symbol.to_string(),
                    date: Self::parse_date(&date_str)?,
                    open: Self::parse_decimal(&daily.open)?,
                    high: Self::parse_decimal(&daily.high)?,
                    low: Self::parse_decimal(&daily.low)?,
                    close: Self::parse_decimal(&daily.close)?,
                    volume: Self::parse_volume(&daily.volume)?,
                })
            })
            .collect();

        if bars.len() < total {
            warn!(
                "Alpha Vantage: skipped {} unparseable entries for {}",
                total - bars.len(),
                symbol
            );
        }

        bars.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(bars)
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_daily_series(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        let params = [
            ("function", DAILY_FUNCTION),
            ("symbol", symbol),
            ("outputsize", "compact"),
        ];

        let text = self.fetch(&params).await?;
        let bars = Self::parse_time_series(symbol, &text)?;

        debug!(
            "Alpha Vantage: fetched {} daily bars for {}",
            bars.len(),
            symbol
        );

        Ok(bars)
    }
}
