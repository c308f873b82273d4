//! Unit tests for the price refresh pass.

use super::*;
use crate::errors::{DatabaseError, Error, Result};
use crate::holdings::{Holding, HoldingPriceUpdate, HoldingRepositoryTrait, NewHolding};
use crate::quotes::{LatestPrice, QuoteFetcher};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trackfolio_market_data::errors::MarketDataError;

const PACING: Duration = Duration::from_secs(1);

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockHoldingRepository {
    holdings: Mutex<Vec<Holding>>,
    fail_listing: bool,
    fail_writes_for: Option<String>,
    writes: Mutex<Vec<(String, HoldingPriceUpdate)>>,
}

impl MockHoldingRepository {
    fn new(holdings: Vec<Holding>) -> Self {
        Self {
            holdings: Mutex::new(holdings),
            ..Default::default()
        }
    }

    fn holding(&self, id: &str) -> Holding {
        self.holdings
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .unwrap()
    }

    fn written_ids(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[async_trait]
impl HoldingRepositoryTrait for MockHoldingRepository {
    fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        self.holdings
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id == holding_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(holding_id.to_string()).into())
    }

    fn list_refresh_eligible(&self) -> Result<Vec<Holding>> {
        if self.fail_listing {
            return Err(DatabaseError::ConnectionFailed("store unreachable".to_string()).into());
        }
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.is_refresh_eligible())
            .cloned()
            .collect())
    }

    fn list_active_positions(&self, user_id: &str) -> Result<Vec<Holding>> {
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.user_id == user_id && h.is_active_position())
            .cloned()
            .collect())
    }

    async fn insert_holding(&self, _new_holding: NewHolding) -> Result<Holding> {
        unimplemented!()
    }

    async fn update_price(&self, holding_id: &str, update: HoldingPriceUpdate) -> Result<usize> {
        if self.fail_writes_for.as_deref() == Some(holding_id) {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        self.writes
            .lock()
            .unwrap()
            .push((holding_id.to_string(), update.clone()));

        let mut holdings = self.holdings.lock().unwrap();
        match holdings.iter_mut().find(|h| h.id == holding_id) {
            Some(holding) => {
                holding.current_price = Some(update.current_price);
                holding.last_updated = Some(update.last_updated);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_holding(&self, holding_id: &str) -> Result<usize> {
        let mut holdings = self.holdings.lock().unwrap();
        let before = holdings.len();
        holdings.retain(|h| h.id != holding_id);
        Ok(before - holdings.len())
    }
}

#[derive(Clone)]
enum Scripted {
    Price(Decimal),
    NoQuote,
    Fail,
}

#[derive(Default)]
struct MockQuoteFetcher {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl MockQuoteFetcher {
    fn new(script: &[(&str, Scripted)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(ticker, s)| (ticker.to_string(), s.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteFetcher for MockQuoteFetcher {
    async fn get_latest_price(&self, ticker: &str) -> Result<Option<LatestPrice>> {
        self.calls.lock().unwrap().push(ticker.to_string());
        match self.script.get(ticker) {
            Some(Scripted::Price(price)) => Ok(Some(LatestPrice::new(*price))),
            Some(Scripted::NoQuote) | None => Ok(None),
            Some(Scripted::Fail) => Err(Error::MarketData(MarketDataError::ProviderError {
                provider: "MOCK".to_string(),
                message: format!("no data for {}", ticker),
            })),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn holding(id: &str, ticker: &str, shares: Decimal, is_in_watchlist: bool) -> Holding {
    let created_at = Utc::now() - ChronoDuration::days(30);
    Holding {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        name: ticker.to_string(),
        ticker: ticker.to_string(),
        shares,
        buy_price: Some(dec!(100)),
        target_price: None,
        is_in_watchlist,
        current_price: Some(dec!(99)),
        last_updated: Some(created_at),
        created_at,
    }
}

fn service(
    repo: &Arc<MockHoldingRepository>,
    fetcher: &Arc<MockQuoteFetcher>,
) -> PriceRefreshService {
    PriceRefreshService::new(repo.clone(), fetcher.clone(), PACING)
}

fn scenario_holdings() -> Vec<Holding> {
    vec![
        holding("1", "AAPL", dec!(5), false),
        holding("2", "GLD", dec!(0), true),
        holding("3", "XYZ", dec!(0), false),
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_refreshes_eligible_holdings_only() {
    let repo = Arc::new(MockHoldingRepository::new(scenario_holdings()));
    let fetcher = Arc::new(MockQuoteFetcher::new(&[
        ("AAPL", Scripted::Price(dec!(150))),
        ("GLD", Scripted::Price(dec!(180))),
        ("XYZ", Scripted::Fail),
    ]));
    let untouched = repo.holding("3");

    let started = tokio::time::Instant::now();
    let wall_start = Utc::now();
    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert!(started.elapsed() >= PACING * 2);
    assert_eq!(fetcher.calls(), vec!["AAPL", "GLD"]);

    let aapl = repo.holding("1");
    assert_eq!(aapl.current_price, Some(dec!(150)));
    assert!(aapl.last_updated.unwrap() >= wall_start);
    assert_eq!(aapl.shares, dec!(5));

    let gld = repo.holding("2");
    assert_eq!(gld.current_price, Some(dec!(180)));
    assert!(gld.is_in_watchlist);

    assert_eq!(repo.holding("3"), untouched);

    assert_eq!(summary.eligible, 2);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_zero_price_is_skipped() {
    let repo = Arc::new(MockHoldingRepository::new(vec![
        holding("1", "ZERO", dec!(2), false),
        holding("2", "NEG", dec!(1), false),
        holding("3", "MSFT", dec!(1), false),
    ]));
    let fetcher = Arc::new(MockQuoteFetcher::new(&[
        ("ZERO", Scripted::Price(dec!(0))),
        ("NEG", Scripted::Price(dec!(-3))),
        ("MSFT", Scripted::Price(dec!(410.5))),
    ]));

    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert_eq!(repo.written_ids(), vec!["3"]);
    assert_eq!(repo.holding("1").current_price, Some(dec!(99)));
    assert_eq!(repo.holding("2").current_price, Some(dec!(99)));
    assert_eq!(repo.holding("3").current_price, Some(dec!(410.5)));
    assert_eq!(summary.skipped, 2);
    assert!(summary
        .skipped_reasons
        .iter()
        .all(|s| s.reason == SkipReason::NonPositivePrice));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_is_isolated() {
    let repo = Arc::new(MockHoldingRepository::new(vec![
        holding("1", "BAD", dec!(1), false),
        holding("2", "NONE", dec!(1), false),
        holding("3", "GOOD", dec!(1), false),
    ]));
    let before = repo.holding("1");
    let fetcher = Arc::new(MockQuoteFetcher::new(&[
        ("BAD", Scripted::Fail),
        ("NONE", Scripted::NoQuote),
        ("GOOD", Scripted::Price(dec!(12))),
    ]));

    let started = tokio::time::Instant::now();
    let summary = service(&repo, &fetcher).refresh_pass().await;

    // pacing is paid after failures and skips too
    assert!(started.elapsed() >= PACING * 3);
    assert_eq!(fetcher.calls(), vec!["BAD", "NONE", "GOOD"]);
    assert_eq!(repo.holding("1"), before);
    assert_eq!(repo.holding("3").current_price, Some(dec!(12)));

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].holding_id, "1");
    assert_eq!(summary.failures[0].stage, FailureStage::Fetch);
    assert_eq!(summary.skipped_reasons[0].reason, SkipReason::NoQuote);
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_is_isolated() {
    let mut repo = MockHoldingRepository::new(vec![
        holding("1", "AAPL", dec!(1), false),
        holding("2", "MSFT", dec!(1), false),
    ]);
    repo.fail_writes_for = Some("1".to_string());
    let repo = Arc::new(repo);
    let fetcher = Arc::new(MockQuoteFetcher::new(&[
        ("AAPL", Scripted::Price(dec!(150))),
        ("MSFT", Scripted::Price(dec!(400))),
    ]));

    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert_eq!(repo.holding("1").current_price, Some(dec!(99)));
    assert_eq!(repo.holding("2").current_price, Some(dec!(400)));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].stage, FailureStage::Write);
    assert!(summary.failures[0].message.contains("disk I/O error"));
}

#[tokio::test(start_paused = true)]
async fn test_listing_failure_aborts_pass() {
    let mut repo = MockHoldingRepository::new(scenario_holdings());
    repo.fail_listing = true;
    let repo = Arc::new(repo);
    let fetcher = Arc::new(MockQuoteFetcher::new(&[("AAPL", Scripted::Price(dec!(1)))]));

    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert!(summary.aborted);
    assert!(!summary.is_complete());
    assert!(fetcher.calls().is_empty());
    assert!(repo.written_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_store_ends_pass_without_pacing() {
    let repo = Arc::new(MockHoldingRepository::new(vec![holding(
        "1",
        "XYZ",
        dec!(0),
        false,
    )]));
    let fetcher = Arc::new(MockQuoteFetcher::default());

    let started = tokio::time::Instant::now();
    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(summary.eligible, 0);
    assert!(!summary.aborted);
    assert!(summary.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_pass_duration_scales_with_holding_count() {
    let holdings: Vec<Holding> = (0..5)
        .map(|i| holding(&i.to_string(), &format!("T{}", i), dec!(1), false))
        .collect();
    let script: Vec<(String, Scripted)> = (0..5)
        .map(|i| (format!("T{}", i), Scripted::Price(dec!(10))))
        .collect();
    let script_refs: Vec<(&str, Scripted)> =
        script.iter().map(|(t, s)| (t.as_str(), s.clone())).collect();

    let repo = Arc::new(MockHoldingRepository::new(holdings));
    let fetcher = Arc::new(MockQuoteFetcher::new(&script_refs));

    let started = tokio::time::Instant::now();
    let summary = service(&repo, &fetcher).refresh_pass().await;

    assert!(started.elapsed() >= PACING * 5);
    assert_eq!(summary.updated, 5);
    assert_eq!(fetcher.calls(), vec!["T0", "T1", "T2", "T3", "T4"]);
}

#[tokio::test(start_paused = true)]
async fn test_deleted_holding_is_skipped() {
    struct VanishingRepository(MockHoldingRepository);

    #[async_trait]
    impl HoldingRepositoryTrait for VanishingRepository {
        fn get_holding(&self, holding_id: &str) -> Result<Holding> {
            self.0.get_holding(holding_id)
        }
        fn list_refresh_eligible(&self) -> Result<Vec<Holding>> {
            let listed = self.0.list_refresh_eligible()?;
            // the row disappears right after the listing
            self.0.holdings.lock().unwrap().clear();
            Ok(listed)
        }
        fn list_active_positions(&self, user_id: &str) -> Result<Vec<Holding>> {
            self.0.list_active_positions(user_id)
        }
        async fn insert_holding(&self, new_holding: NewHolding) -> Result<Holding> {
            self.0.insert_holding(new_holding).await
        }
        async fn update_price(&self, id: &str, update: HoldingPriceUpdate) -> Result<usize> {
            self.0.update_price(id, update).await
        }
        async fn delete_holding(&self, id: &str) -> Result<usize> {
            self.0.delete_holding(id).await
        }
    }

    let repo = Arc::new(VanishingRepository(MockHoldingRepository::new(vec![holding(
        "1",
        "AAPL",
        dec!(1),
        false,
    )])));
    let fetcher = Arc::new(MockQuoteFetcher::new(&[("AAPL", Scripted::Price(dec!(150)))]));

    let summary = PriceRefreshService::new(repo, fetcher, PACING)
        .refresh_pass()
        .await;

    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped_reasons[0].reason, SkipReason::HoldingRemoved);
}
