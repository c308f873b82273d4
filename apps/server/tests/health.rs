use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use tempfile::tempdir;
use tower::ServiceExt;
use std::time::Duration;
use rust_decimal_macros::dec;
use trackfolio_core::holdings::{HoldingRepositoryTrait, NewHolding};
use trackfolio_core::quotes::ProviderConfig;
use trackfolio_core::refresh::RefreshConfig;
use trackfolio_server::{api::app_router, build_state, config::Config};
use trackfolio_storage_sqlite::{db, HoldingRepository};

fn test_config(db_path: &std::path::Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: db_path.to_string_lossy().to_string(),
        request_timeout: Duration::from_secs(5),
        providers: ProviderConfig {
            finnhub_api_key: "test".to_string(),
            // nothing listens here, so no request leaves the machine
            finnhub_base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        },
        refresh: RefreshConfig {
            pacing_delay: Duration::from_millis(1),
            ..Default::default()
        },
    }
}

async fn get_json(app: axum::Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_last_refresh_pass() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp.path().join("test.db"));

    let (state, scheduler) = build_state(&config).await.unwrap();

    // the first pass runs right after startup
    let mut summaries = scheduler.subscribe();
    summaries.changed().await.unwrap();

    let app = app_router(state, &config);
    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running");
    assert!(body["lastRefresh"].is_object());
    assert_eq!(body["lastRefresh"]["aborted"], false);
    assert_eq!(body["lastRefresh"]["eligible"], 0);

    scheduler.shutdown().await;
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp.path().join("test.db"));
    let (state, scheduler) = build_state(&config).await.unwrap();

    let response = app_router(state, &config)
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    scheduler.shutdown().await;
}

fn new_holding(ticker: &str, shares: rust_decimal::Decimal, is_in_watchlist: bool) -> NewHolding {
    NewHolding {
        id: None,
        user_id: "alice".to_string(),
        name: ticker.to_string(),
        ticker: ticker.to_string(),
        shares,
        buy_price: Some(dec!(100)),
        target_price: None,
        is_in_watchlist,
        current_price: Some(dec!(150)),
    }
}

#[tokio::test]
async fn portfolio_summary_covers_active_positions() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db");
    let config = test_config(&db_path);

    {
        let (pool, writer) = db::open(db_path.to_str().unwrap()).unwrap();
        let repo = HoldingRepository::new(pool, writer);
        repo.insert_holding(new_holding("AAPL", dec!(10), false))
            .await
            .unwrap();
        repo.insert_holding(new_holding("TSLA", dec!(3), true))
            .await
            .unwrap();
    }

    let (state, scheduler) = build_state(&config).await.unwrap();
    let mut summaries = scheduler.subscribe();
    summaries.changed().await.unwrap();

    let app = app_router(state, &config);
    let (status, body) = get_json(app.clone(), "/api/portfolio/alice/summary").await;
    assert_eq!(status, 200);
    assert_eq!(body["totalValue"], 1500.0);
    assert_eq!(body["totalGain"], 500.0);
    assert_eq!(body["totalGainPercent"], 50.0);
    assert_eq!(body["holdingCount"], 1);

    let (status, body) = get_json(app, "/api/portfolio/nobody/summary").await;
    assert_eq!(status, 200);
    assert_eq!(body["holdingCount"], 0);
    assert_eq!(body["totalGainPercent"], 0.0);

    scheduler.shutdown().await;
}
