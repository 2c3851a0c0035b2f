//! Wire types for the HTTP API.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use stockfeed_core::constants::DATE_FORMAT;
use stockfeed_core::prices as core_prices;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of `GET /api/financial_data`.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct FinancialDataQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub symbol: Option<String>,
    /// Page size, default 5.
    #[serde(default, deserialize_with = "query_input::deserialize_option_i64")]
    pub limit: Option<i64>,
    /// 1-based page, default 1.
    #[serde(default, deserialize_with = "query_input::deserialize_option_i64")]
    pub page: Option<i64>,
}

impl From<FinancialDataQuery> for core_prices::ListPriceRecordsRequest {
    fn from(q: FinancialDataQuery) -> Self {
        let defaults = core_prices::ListPriceRecordsRequest::default();
        Self {
            start_date: q.start_date,
            end_date: q.end_date,
            symbol: q.symbol,
            limit: q.limit.unwrap_or(defaults.limit),
            page: q.page.unwrap_or(defaults.page),
        }
    }
}

/// Query parameters of `GET /api/statistics`.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub symbol: Option<String>,
}

impl From<StatisticsQuery> for core_prices::PriceStatisticsRequest {
    fn from(q: StatisticsQuery) -> Self {
        Self {
            start_date: q.start_date,
            end_date: q.end_date,
            symbol: q.symbol,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub symbol: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub open_price: f64,
    pub close_price: f64,
    pub volume: i64,
}

impl From<core_prices::PriceRecord> for PriceRecord {
    fn from(r: core_prices::PriceRecord) -> Self {
        Self {
            symbol: r.symbol,
            date: r.date.format(DATE_FORMAT).to_string(),
            open_price: r.open_price.to_f64().unwrap_or_default(),
            close_price: r.close_price.to_f64().unwrap_or_default(),
            volume: r.volume,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl From<core_prices::Pagination> for Pagination {
    fn from(p: core_prices::Pagination) -> Self {
        Self {
            count: p.count,
            page: p.page,
            limit: p.limit,
            pages: p.pages,
        }
    }
}

/// `error` is empty on success.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub error: String,
}

impl From<core_prices::ResponseInfo> for ResponseInfo {
    fn from(i: core_prices::ResponseInfo) -> Self {
        Self { error: i.error }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct FinancialDataResponse {
    pub data: Vec<PriceRecord>,
    pub pagination: Option<Pagination>,
    pub info: ResponseInfo,
}

impl From<core_prices::PriceRecordListResponse> for FinancialDataResponse {
    fn from(r: core_prices::PriceRecordListResponse) -> Self {
        Self {
            data: r.data.into_iter().map(PriceRecord::from).collect(),
            pagination: r.pagination.map(Pagination::from),
            info: r.info.into(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Statistics {
    pub start_date: String,
    pub end_date: String,
    pub symbol: String,
    pub average_daily_open_price: f64,
    pub average_daily_close_price: f64,
    pub average_daily_volume: f64,
}

impl From<core_prices::PriceStatistics> for Statistics {
    fn from(s: core_prices::PriceStatistics) -> Self {
        Self {
            start_date: s.start_date.format(DATE_FORMAT).to_string(),
            end_date: s.end_date.format(DATE_FORMAT).to_string(),
            symbol: s.symbol,
            average_daily_open_price: s.average_daily_open_price,
            average_daily_close_price: s.average_daily_close_price,
            average_daily_volume: s.average_daily_volume,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct StatisticsResponse {
    pub data: Option<Statistics>,
    pub info: ResponseInfo,
}

impl From<core_prices::PriceStatisticsResponse> for StatisticsResponse {
    fn from(r: core_prices::PriceStatisticsResponse) -> Self {
        Self {
            data: r.data.map(Statistics::from),
            info: r.info.into(),
        }
    }
}

mod query_input {
    use serde::{de, Deserialize, Deserializer};

    /// Blank is absent; anything else must be an integer.
    pub fn deserialize_option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse::<i64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid integer '{}'", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_record_wire_shape() {
        let record = PriceRecord::from(core_prices::PriceRecord {
            symbol: "IBM".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            open_price: dec!(140.25),
            close_price: dec!(141.5),
            volume: 3_000_000,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "IBM",
                "date": "2023-01-05",
                "open_price": 140.25,
                "close_price": 141.5,
                "volume": 3000000
            })
        );
    }

    #[test]
    fn test_list_query_defaults() {
        let request: core_prices::ListPriceRecordsRequest = FinancialDataQuery::default().into();
        assert_eq!(request.limit, 5);
        assert_eq!(request.page, 1);
    }
}
