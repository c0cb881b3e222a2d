use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which return figure to compute over a valuation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReturnMode {
    /// Day-chained time-weighted return over the requested window.
    #[default]
    Period,
    /// Return on cumulative net contribution as of the last point.
    AllTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TotalReturn {
    pub gain_loss_amount: Decimal,
    pub return_ratio: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnData {
    pub date: NaiveDate,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub period_start_date: Option<NaiveDate>,
    pub period_end_date: Option<NaiveDate>,
    pub gain_loss_amount: Decimal,
    /// Cumulative time-weighted return
    pub cumulative_twr: Decimal,
    pub annualized_twr: Decimal,
    pub volatility: Decimal,
    pub max_drawdown: Decimal,
}
