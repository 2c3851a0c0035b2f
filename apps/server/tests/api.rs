use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use stockfeed_core::prices::PriceRecord;
use stockfeed_server::{api::app_router, build_state, config::Config, AppState};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn test_app() -> (Router, Arc<AppState>, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        alpha_vantage_api_key: None,
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    let app = app_router(state.clone(), &config);
    (app, state, tmp)
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_january(state: &AppState) {
    let mut records: Vec<PriceRecord> = (0..25)
        .map(|i| PriceRecord {
            symbol: "IBM".to_string(),
            date: ymd(2023, 1, 1) + Duration::days(i),
            open_price: dec!(140) + Decimal::from(i),
            close_price: dec!(141) + Decimal::from(i),
            volume: 1_000 + i,
        })
        .collect();
    records.push(PriceRecord {
        symbol: "AAPL".to_string(),
        date: ymd(2023, 1, 15),
        open_price: dec!(130.5),
        close_price: dec!(131.5),
        volume: 5_000,
    });
    state.price_repository.upsert_price_records(records).await.unwrap();
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn healthz_works() {
    let (app, _state, _tmp) = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn financial_data_first_page_of_month() {
    let (app, state, _tmp) = test_app().await;
    seed_january(&state).await;

    let (status, body) = get(
        &app,
        "/api/financial_data?symbol=IBM&start_date=2023-01-01&end_date=2023-01-31&limit=10&page=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["error"], "");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["date"], "2023-01-25");
    assert_eq!(data[0]["open_price"], 164.0);
    assert_eq!(data[9]["date"], "2023-01-16");
    assert_eq!(body["pagination"]["count"], 25);
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[tokio::test]
async fn financial_data_blank_parameters_use_defaults() {
    let (app, state, _tmp) = test_app().await;
    seed_january(&state).await;

    let (status, body) = get(&app, "/api/financial_data?limit=&page=&symbol=&start_date=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["count"], 26);
    assert_eq!(body["pagination"]["limit"], 5);
    assert_eq!(body["pagination"]["pages"], 6);
}

#[tokio::test]
async fn financial_data_rejections_are_in_band() {
    let (app, _state, _tmp) = test_app().await;

    let cases = [
        ("/api/financial_data?limit=0", "Input limit is invalid"),
        ("/api/financial_data?limit=-5&page=-1", "Input limit is invalid"),
        ("/api/financial_data?page=-1", "Input page is invalid"),
        ("/api/financial_data?start_date=2023-13-01", "Input start date is invalid"),
        ("/api/financial_data?end_date=tomorrow", "Input end date is invalid"),
        (
            "/api/financial_data?start_date=2023-02-01&end_date=2023-01-01",
            "Input end date is before start date",
        ),
    ];

    for (uri, message) in cases {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["info"]["error"], message, "{}", uri);
        assert_eq!(body["data"], Value::Array(vec![]), "{}", uri);
        assert!(body["pagination"].is_null(), "{}", uri);
    }
}

#[tokio::test]
async fn financial_data_non_numeric_limit_is_bad_request() {
    let (app, _state, _tmp) = test_app().await;

    let (status, body) = get(&app, "/api/financial_data?limit=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn statistics_for_symbol_and_range() {
    let (app, state, _tmp) = test_app().await;
    seed_january(&state).await;

    let (status, body) = get(
        &app,
        "/api/statistics?symbol=AAPL&start_date=2023/01/01&end_date=20230131",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["error"], "");
    assert_eq!(body["data"]["symbol"], "AAPL");
    assert_eq!(body["data"]["start_date"], "2023-01-01");
    assert_eq!(body["data"]["end_date"], "2023-01-31");
    assert_eq!(body["data"]["average_daily_open_price"], 130.5);
    assert_eq!(body["data"]["average_daily_close_price"], 131.5);
    assert_eq!(body["data"]["average_daily_volume"], 5000.0);
}

#[tokio::test]
async fn statistics_without_rows() {
    let (app, _state, _tmp) = test_app().await;

    let (status, body) = get(
        &app,
        "/api/statistics?symbol=AAPL&start_date=2023-02-01&end_date=2023-02-14",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());
    assert_eq!(body["info"]["error"], "No data found for given parameters.");
}

#[tokio::test]
async fn statistics_rejections_are_in_band() {
    let (app, _state, _tmp) = test_app().await;

    let cases = [
        ("/api/statistics?symbol=IBM&end_date=2023-01-31", "Input start date is invalid"),
        ("/api/statistics?symbol=IBM&start_date=2023-01-01", "Input end date is invalid"),
        (
            "/api/statistics?symbol=IBM&start_date=2023-02-01&end_date=2023-01-01",
            "Input end date is before start date",
        ),
        (
            "/api/statistics?start_date=2023-01-01&end_date=2023-01-31",
            "Symbol is not specified",
        ),
    ];

    for (uri, message) in cases {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["info"]["error"], message, "{}", uri);
        assert!(body["data"].is_null(), "{}", uri);
    }
}

#[tokio::test]
async fn openapi_document_lists_read_endpoints() {
    let (app, _state, _tmp) = test_app().await;

    let (status, body) = get(&app, "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/financial_data"].is_object());
    assert!(body["paths"]["/api/statistics"].is_object());
}
