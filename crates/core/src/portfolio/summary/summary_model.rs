use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Result, ValidationError};
use crate::holdings::Holding;

/// Totals over a user's active positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_gain: Decimal,
    pub total_gain_percent: Decimal,
    pub holding_count: usize,
}

impl PortfolioSummary {
    /// Watchlist entries and zero-share rows are ignored. A position without
    /// a price is worth zero; one without a buy price has zero cost.
    ///
    /// The gain percent is zero until the portfolio has a positive value.
    /// Totals beyond `Decimal` range are a validation error.
    pub fn from_holdings(holdings: &[Holding]) -> Result<Self> {
        let mut total_value = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        let mut holding_count = 0;

        for holding in holdings.iter().filter(|h| h.is_active_position()) {
            total_value = checked_total(total_value, holding.market_value()?)?;
            total_cost = checked_total(total_cost, holding.cost_basis()?)?;
            holding_count += 1;
        }

        let total_gain = total_value
            .checked_sub(total_cost)
            .ok_or_else(|| overflow("total gain"))?;

        let total_gain_percent = if total_value > Decimal::ZERO && total_cost > Decimal::ZERO {
            total_gain
                .checked_div(total_cost)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow("total gain percent"))?
                .round_dp(DISPLAY_DECIMAL_PRECISION)
        } else {
            Decimal::ZERO
        };

        Ok(Self {
            total_value,
            total_gain,
            total_gain_percent,
            holding_count,
        })
    }
}

fn checked_total(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| overflow("portfolio total"))
}

fn overflow(what: &str) -> crate::errors::Error {
    ValidationError::DecimalConversion(format!("{} is out of range", what)).into()
}
