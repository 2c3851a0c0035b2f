//! Prices module - stored daily price records, the query service and its traits.

mod prices_model;
mod prices_service;
mod prices_traits;


pub use prices_model::{
    ListPriceRecordsRequest, Pagination, PriceAverages, PriceRecord, PriceRecordFilter,
    PriceRecordListResponse, PriceRecordPage, PriceStatistics, PriceStatisticsRequest,
    PriceStatisticsResponse, ResponseInfo,
};
pub use prices_service::PriceQueryService;
pub use prices_traits::{PriceQueryServiceTrait, PriceRecordRepositoryTrait};
