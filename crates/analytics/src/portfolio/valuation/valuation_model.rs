//! Portfolio valuation domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dated valuation snapshot of an account, as produced by the upstream
/// valuation engine.
///
/// `total_value` and `net_contribution` are expressed in the account currency;
/// `fx_rate_to_base` converts them into `base_currency` at `valuation_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub account_id: String,
    pub valuation_date: NaiveDate,
    pub account_currency: String,
    pub base_currency: String,
    pub fx_rate_to_base: Decimal,
    pub total_value: Decimal,
    pub net_contribution: Decimal,
}

impl ValuationPoint {
    /// Total value converted into the point's base currency.
    pub fn total_value_in_base(&self) -> Decimal {
        self.total_value * self.fx_rate_to_base
    }
}
