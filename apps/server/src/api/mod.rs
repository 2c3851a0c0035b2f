use std::sync::Arc;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        FinancialDataResponse, Pagination, PriceRecord, ResponseInfo, Statistics,
        StatisticsResponse,
    },
};
use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod financial_data;
pub mod health;
pub mod statistics;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        financial_data::list_financial_data,
        statistics::get_statistics
    ),
    components(schemas(
        PriceRecord,
        Pagination,
        ResponseInfo,
        FinancialDataResponse,
        Statistics,
        StatisticsResponse
    )),
    tags((name = "stockfeed"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(financial_data::router())
        .merge(statistics::router())
        .route("/openapi.json", get(|| async { Json(openapi) }));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
