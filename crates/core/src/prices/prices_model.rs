//! Price record domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockfeed_market_data::DailyBar;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use crate::validation::QueryValidationError;

/// One stored trading day for one symbol. `(symbol, date)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open_price: Decimal,
    pub close_price: Decimal,
    pub volume: i64,
}

impl From<DailyBar> for PriceRecord {
    fn from(bar: DailyBar) -> Self {
        Self {
            symbol: bar.symbol,
            date: bar.date,
            open_price: bar.open,
            close_price: bar.close,
            volume: bar.volume,
        }
    }
}

/// Row filter for the listing. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRecordFilter {
    pub symbol: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One window of matching records plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRecordPage {
    pub count: i64,
    pub records: Vec<PriceRecord>,
}

/// Averages over all rows of a symbol in a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAverages {
    pub symbol: String,
    pub average_open_price: f64,
    pub average_close_price: f64,
    pub average_volume: f64,
}

/// Raw listing parameters as received from the caller.
///
/// Dates and symbol stay as strings so that validation can report which one
/// was malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPriceRecordsRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub symbol: Option<String>,
    pub limit: i64,
    pub page: i64,
}

impl Default for ListPriceRecordsRequest {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            symbol: None,
            limit: DEFAULT_PAGE_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

/// Raw statistics parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceStatisticsRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl Pagination {
    /// `limit` must be positive.
    pub fn new(count: i64, page: i64, limit: i64) -> Self {
        let pages = count / limit + i64::from(count % limit > 0);
        Self {
            count,
            page,
            limit,
            pages,
        }
    }
}

/// In-band status carried by every response. `error` is empty on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseInfo {
    pub error: String,
}

impl ResponseInfo {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<QueryValidationError> for ResponseInfo {
    fn from(err: QueryValidationError) -> Self {
        Self::error(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecordListResponse {
    pub data: Vec<PriceRecord>,
    pub pagination: Option<Pagination>,
    pub info: ResponseInfo,
}

impl PriceRecordListResponse {
    pub fn rejected(err: QueryValidationError) -> Self {
        Self {
            data: Vec::new(),
            pagination: None,
            info: err.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceStatistics {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub symbol: String,
    pub average_daily_open_price: f64,
    pub average_daily_close_price: f64,
    pub average_daily_volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceStatisticsResponse {
    pub data: Option<PriceStatistics>,
    pub info: ResponseInfo,
}

impl PriceStatisticsResponse {
    pub fn failed(info: impl Into<ResponseInfo>) -> Self {
        Self {
            data: None,
            info: info.into(),
        }
    }
}
