use chrono::NaiveDate;
use log::{debug, error};
use std::sync::Arc;

use crate::constants::NO_DATA_FOUND_MESSAGE;
use crate::errors::Result;
use crate::prices::prices_model::{
    ListPriceRecordsRequest, Pagination, PriceRecordFilter, PriceRecordListResponse,
    PriceStatistics, PriceStatisticsRequest, PriceStatisticsResponse, ResponseInfo,
};
use crate::prices::prices_traits::{PriceQueryServiceTrait, PriceRecordRepositoryTrait};
use crate::validation::{is_date_after, parse_date, QueryValidationError};

/// Read-side service behind the listing and statistics endpoints.
///
/// Rejected parameters never reach the repository; they come back as an
/// in-band message. Only storage failures surface as `Err`.
pub struct PriceQueryService {
    repository: Arc<dyn PriceRecordRepositoryTrait>,
}

impl PriceQueryService {
    pub fn new(repository: Arc<dyn PriceRecordRepositoryTrait>) -> Self {
        Self { repository }
    }
}

/// Blank parameters are treated as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses an optional date; present but malformed maps to `invalid`.
fn optional_date(
    value: Option<&str>,
    invalid: QueryValidationError,
) -> std::result::Result<Option<NaiveDate>, QueryValidationError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => parse_date(raw).map(Some).ok_or(invalid),
    }
}

fn validate_list_request(
    request: &ListPriceRecordsRequest,
) -> std::result::Result<PriceRecordFilter, QueryValidationError> {
    if request.limit <= 0 {
        return Err(QueryValidationError::InvalidLimit);
    }
    if request.page < 0 {
        return Err(QueryValidationError::InvalidPage);
    }
    let start_date = optional_date(
        request.start_date.as_deref(),
        QueryValidationError::InvalidStartDate,
    )?;
    let end_date = optional_date(
        request.end_date.as_deref(),
        QueryValidationError::InvalidEndDate,
    )?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if !is_date_after(start, end) {
            return Err(QueryValidationError::EndBeforeStart);
        }
    }

    Ok(PriceRecordFilter {
        symbol: non_blank(request.symbol.as_deref()).map(str::to_string),
        start_date,
        end_date,
    })
}

fn validate_statistics_request(
    request: &PriceStatisticsRequest,
) -> std::result::Result<(NaiveDate, NaiveDate, String), QueryValidationError> {
    let start = non_blank(request.start_date.as_deref())
        .and_then(parse_date)
        .ok_or(QueryValidationError::InvalidStartDate)?;
    let end = non_blank(request.end_date.as_deref())
        .and_then(parse_date)
        .ok_or(QueryValidationError::InvalidEndDate)?;
    if !is_date_after(start, end) {
        return Err(QueryValidationError::EndBeforeStart);
    }
    let symbol = non_blank(request.symbol.as_deref()).ok_or(QueryValidationError::MissingSymbol)?;

    Ok((start, end, symbol.to_string()))
}

impl PriceQueryServiceTrait for PriceQueryService {
    fn list_price_records(
        &self,
        request: ListPriceRecordsRequest,
    ) -> Result<PriceRecordListResponse> {
        let filter = match validate_list_request(&request) {
            Ok(filter) => filter,
            Err(rejection) => {
                debug!("Rejected listing request {:?}: {}", request, rejection);
                return Ok(PriceRecordListResponse::rejected(rejection));
            }
        };

        // Page 0 reads the first page.
        let offset = (request.page - 1).max(0).saturating_mul(request.limit);

        let page = self
            .repository
            .find_price_records(&filter, request.limit, offset)
            .map_err(|e| {
                error!(
                    "Failed to list price records (filter {:?}, limit {}, offset {}): {}",
                    filter, request.limit, offset, e
                );
                e
            })?;

        Ok(PriceRecordListResponse {
            pagination: Some(Pagination::new(page.count, request.page, request.limit)),
            data: page.records,
            info: ResponseInfo::ok(),
        })
    }

    fn get_price_statistics(
        &self,
        request: PriceStatisticsRequest,
    ) -> Result<PriceStatisticsResponse> {
        let (start_date, end_date, symbol) = match validate_statistics_request(&request) {
            Ok(params) => params,
            Err(rejection) => {
                debug!("Rejected statistics request {:?}: {}", request, rejection);
                return Ok(PriceStatisticsResponse::failed(rejection));
            }
        };

        let averages = self
            .repository
            .get_price_averages(&symbol, start_date, end_date)
            .map_err(|e| {
                error!(
                    "Failed to compute statistics for {} between {} and {}: {}",
                    symbol, start_date, end_date, e
                );
                e
            })?;

        let Some(averages) = averages else {
            return Ok(PriceStatisticsResponse::failed(ResponseInfo::error(
                NO_DATA_FOUND_MESSAGE,
            )));
        };

        Ok(PriceStatisticsResponse {
            data: Some(PriceStatistics {
                start_date,
                end_date,
                symbol: averages.symbol,
                average_daily_open_price: averages.average_open_price,
                average_daily_close_price: averages.average_close_price,
                average_daily_volume: averages.average_volume,
            }),
            info: ResponseInfo::ok(),
        })
    }
}
