use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{FinancialDataQuery, FinancialDataResponse},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

/// Lists stored daily records, newest first.
///
/// Invalid parameters are reported in `info.error` with a 200 status.
#[utoipa::path(
    get,
    path = "/api/financial_data",
    params(FinancialDataQuery),
    responses(
        (status = 200, body = FinancialDataResponse),
        (status = 400, description = "Non-numeric limit or page")
    )
)]
pub async fn list_financial_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FinancialDataQuery>, QueryRejection>,
) -> ApiResult<Json<FinancialDataResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let response = state.price_query_service.list_price_records(query.into())?;
    Ok(Json(response.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/financial_data", get(list_financial_data))
}
