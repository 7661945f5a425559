//! HTTP handlers driven directly with extracted inputs.

mod market_common;

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tower::ServiceExt;

use market_common::*;
use options_screener::api::handlers::{analyze, validate};
use options_screener::api::router;
use options_screener::api::state::AppState;
use options_screener::api::types::{AnalyzeBody, ValidateQuery};
use options_screener::config::AnalysisConfig;
use options_screener::model::Quote;

fn state(market: FakeMarket) -> AppState {
    let market = Arc::new(market);
    let (analyzer, _clock) = analyzer(market.clone(), &no_pacing());
    AppState::new(Arc::new(analyzer), market, AnalysisConfig::default())
}

fn market() -> FakeMarket {
    FakeMarket::new()
        .with_snapshot(
            "AAPL",
            Reply::Data(snapshot(
                100.0,
                vec![expiration(5), expiration(20)],
                Some(puts(vec![contract(95.0, 1.0, 1.2)])),
            )),
        )
        .with_chain("AAPL", expiration(20), Reply::Data(puts(vec![
            contract(97.0, 1.4, 1.6),
            contract(91.0, 0.4, 0.6),
        ])))
        .with_quote(
            "AAPL",
            Reply::Data(Quote {
                symbol: "AAPL".into(),
                price: 187.25,
                name: "Apple Inc.".into(),
            }),
        )
        .with_quote("BROKE", Reply::Status(503))
}

async fn post_analyze(state: AppState, body: Value) -> Response {
    let body: AnalyzeBody = serde_json::from_value(body).unwrap();
    analyze::analyze(State(state), Ok(Json(body)))
        .await
        .into_response()
}

async fn get_validate(state: AppState, ticker: Option<&str>) -> Response {
    let query = ValidateQuery {
        ticker: ticker.map(str::to_string),
    };
    validate::validate_ticker(State(state), Query(query))
        .await
        .into_response()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(request: Request<Body>) -> Response {
    router(state(market())).oneshot(request).await.unwrap()
}

fn post_raw(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ── Routing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let response = send(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    for body in ["{\"tickers\": [", "{\"tickers\": \"AAPL\"}", "42"] {
        let response = send(post_raw(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        let error = json_body(response).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid request body"), "{error}");
    }
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .body(Body::from(r#"{"tickers": []}"#))
        .unwrap();

    let response = send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_through_router() {
    let response = send(post_raw(
        r#"{"tickers": [{"ticker": "AAPL", "optionType": "Put", "otmPercent": 10}], "minDays": 1, "maxDays": 30}"#,
    ))
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_validate_through_router() {
    let response = send(
        Request::builder()
            .uri("/api/validate?ticker=AAPL")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["valid"], true);

    let response = send(Request::builder().uri("/api/validate").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ── /api/analyze ────────────────────────────────────────────────────

#[tokio::test]
async fn test_analyze_returns_ranked_results() {
    let response = post_analyze(
        state(market()),
        json!({
            "tickers": [{"ticker": "aapl", "optionType": "put", "otmPercent": "10"}],
            "minDays": 1,
            "maxDays": 30
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    let first = &results[0];
    assert_eq!(first["ticker"], "AAPL");
    assert_eq!(first["type"], "PUT");
    assert_eq!(first["days_to_expiry"], 5);
    assert!(first["return_30d"].as_f64().unwrap() > results[1]["return_30d"].as_f64().unwrap());
}

#[tokio::test]
async fn test_analyze_applies_default_window() {
    // Defaults are 7..=45 days, so the 5-day expiration is dropped.
    let response = post_analyze(
        state(market()),
        json!({"tickers": [{"ticker": "AAPL", "optionType": "put", "otmPercent": 10}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["days_to_expiry"] == 20));
}

#[tokio::test]
async fn test_analyze_rejects_missing_and_empty_tickers() {
    for body in [json!({}), json!({"tickers": []})] {
        let response = post_analyze(state(market()), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "No tickers provided"}));
    }
}

#[tokio::test]
async fn test_analyze_inverted_window_is_empty_success() {
    let response = post_analyze(
        state(market()),
        json!({
            "tickers": [{"ticker": "AAPL", "optionType": "put", "otmPercent": 10}],
            "minDays": 40,
            "maxDays": 10
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"results": []}));
}

#[tokio::test]
async fn test_analyze_skips_malformed_ticker_entries() {
    let response = post_analyze(
        state(market()),
        json!({
            "tickers": [
                {"ticker": "AAPL", "optionType": "put", "otmPercent": 10},
                {"ticker": "MSFT", "otmPercent": 10}
            ],
            "minDays": 1,
            "maxDays": 30
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r["ticker"] == "AAPL"));
}

#[tokio::test]
async fn test_analyze_rejects_when_no_entry_is_usable() {
    let response = post_analyze(
        state(market()),
        json!({"tickers": [{"ticker": "MSFT"}, {"optionType": "put", "otmPercent": 5}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "No tickers provided"}));
}

#[tokio::test]
async fn test_analyze_provider_failures_still_succeed() {
    let response = post_analyze(
        state(market()),
        json!({"tickers": [{"ticker": "NOPE", "optionType": "put", "otmPercent": 10}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"results": []}));
}

#[tokio::test]
async fn test_analyze_panic_becomes_generic_500() {
    let market = market().with_snapshot("BOOM", Reply::Panic);
    let response = post_analyze(
        state(market),
        json!({"tickers": [{"ticker": "BOOM", "optionType": "put", "otmPercent": 10}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({"error": "Error analyzing options."}));
}

// ── /api/validate ───────────────────────────────────────────────────

#[tokio::test]
async fn test_validate_known_ticker() {
    let response = get_validate(state(market()), Some("aapl")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"valid": true, "price": 187.25, "name": "Apple Inc."})
    );
}

#[tokio::test]
async fn test_validate_missing_ticker_is_bad_request() {
    for ticker in [None, Some(""), Some("   ")] {
        let response = get_validate(state(market()), ticker).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"valid": false, "error": "No ticker provided"})
        );
    }
}

#[tokio::test]
async fn test_validate_unknown_or_failing_ticker() {
    for ticker in ["ZZZZ", "BROKE"] {
        let response = get_validate(state(market()), Some(ticker)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"valid": false, "error": "Invalid ticker"})
        );
    }
}
