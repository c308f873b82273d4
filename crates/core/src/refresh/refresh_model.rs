//! Refresh domain models.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PACING_DELAY, DEFAULT_REFRESH_INTERVAL};

/// Scheduling knobs of the refresh job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Time between the starts of two scheduled passes
    pub interval: Duration,
    /// Wait after each holding, whatever its outcome
    pub pacing_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

/// Why a holding was left untouched without counting as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// The provider has no quote for the ticker
    NoQuote,
    /// The quote carried a zero or negative price
    NonPositivePrice,
    /// The holding was deleted between the listing and the write
    HoldingRemoved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureStage {
    Fetch,
    Write,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    pub holding_id: String,
    pub ticker: String,
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedHolding {
    pub holding_id: String,
    pub ticker: String,
    pub reason: SkipReason,
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Number of holdings the store reported as eligible
    pub eligible: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The eligible-holdings query itself failed
    pub aborted: bool,
    pub failures: Vec<RefreshFailure>,
    pub skipped_reasons: Vec<SkippedHolding>,
}

impl RefreshSummary {
    pub fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            eligible: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            aborted: false,
            failures: Vec::new(),
            skipped_reasons: Vec::new(),
        }
    }

    pub(crate) fn record_skip(&mut self, holding_id: &str, ticker: &str, reason: SkipReason) {
        self.skipped += 1;
        self.skipped_reasons.push(SkippedHolding {
            holding_id: holding_id.to_string(),
            ticker: ticker.to_string(),
            reason,
        });
    }

    pub(crate) fn record_failure(
        &mut self,
        holding_id: &str,
        ticker: &str,
        stage: FailureStage,
        message: String,
    ) {
        self.failed += 1;
        self.failures.push(RefreshFailure {
            holding_id: holding_id.to_string(),
            ticker: ticker.to_string(),
            stage,
            message,
        });
    }

    /// Every eligible holding was written.
    pub fn is_complete(&self) -> bool {
        !self.aborted && self.updated == self.eligible
    }
}
