use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{StatisticsQuery, StatisticsResponse},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

/// Averages open price, close price and volume for one symbol over an
/// inclusive date range.
#[utoipa::path(
    get,
    path = "/api/statistics",
    params(StatisticsQuery),
    responses((status = 200, body = StatisticsResponse))
)]
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatisticsQuery>,
) -> ApiResult<Json<StatisticsResponse>> {
    let response = state.price_query_service.get_price_statistics(query.into())?;
    Ok(Json(response.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/statistics", get(get_statistics))
}
