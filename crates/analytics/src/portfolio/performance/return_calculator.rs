//! Return calculations over an ordered valuation history.
//!
//! All functions here are pure. Degenerate inputs (fewer than two points, zero
//! denominators) produce zero results instead of errors.

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use super::{PerformanceSummary, ReturnData, ReturnMode, TotalReturn};
use crate::constants::{DECIMAL_PRECISION, TRADING_DAYS_PER_YEAR};
use crate::portfolio::valuation::ValuationPoint;

const DAYS_PER_YEAR_DECIMAL: Decimal = dec!(365.25);
const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866); // sqrt(252)

/// Computes the gain/loss amount and return ratio of `history`.
///
/// `history` must be ordered by valuation date. With fewer than two points no
/// return can be expressed and `{0, 0}` is returned.
pub fn compute_return(history: &[ValuationPoint], mode: ReturnMode) -> TotalReturn {
    let (first, last) = match history {
        [first, .., last] => (first, last),
        _ => return TotalReturn::default(),
    };

    match mode {
        ReturnMode::Period => TotalReturn {
            gain_loss_amount: period_gain_loss(first, last),
            return_ratio: chained_daily_returns(history)
                .into_iter()
                .filter_map(|(_, daily)| daily)
                .fold(Decimal::ONE, compound)
                - Decimal::ONE,
        },
        ReturnMode::AllTime => all_time_return(last),
    }
}

/// Builds the cumulative time-weighted return series used by performance charts.
///
/// The first entry is always zero; every following entry carries the running
/// chained return up to its date. Skipped steps repeat the previous value.
pub fn compute_cumulative_returns(history: &[ValuationPoint]) -> Vec<ReturnData> {
    let Some(first) = history.first() else {
        return Vec::new();
    };

    let mut returns = Vec::with_capacity(history.len());
    returns.push(ReturnData {
        date: first.valuation_date,
        value: Decimal::ZERO,
    });

    let mut cumulative = Decimal::ONE;
    for (date, daily) in chained_daily_returns(history) {
        if let Some(daily) = daily {
            cumulative = compound(cumulative, daily);
        }
        returns.push(ReturnData {
            date,
            value: (cumulative - Decimal::ONE).round_dp(DECIMAL_PRECISION),
        });
    }

    returns
}

/// Summarizes a valuation history: period TWR, its annualized form, volatility
/// and maximum drawdown.
pub fn compute_performance_summary(history: &[ValuationPoint]) -> PerformanceSummary {
    let (first, last) = match history {
        [first, .., last] => (first, last),
        _ => {
            debug!(
                "Not enough valuation data ({} points) for a performance summary",
                history.len()
            );
            return PerformanceSummary::default();
        }
    };

    let daily_returns: Vec<Decimal> = chained_daily_returns(history)
        .into_iter()
        .filter_map(|(_, daily)| daily)
        .collect();
    let cumulative_twr = daily_returns.iter().copied().fold(Decimal::ONE, compound) - Decimal::ONE;
    let annualized_twr =
        annualized_return(first.valuation_date, last.valuation_date, cumulative_twr);

    PerformanceSummary {
        period_start_date: Some(first.valuation_date),
        period_end_date: Some(last.valuation_date),
        gain_loss_amount: period_gain_loss(first, last).round_dp(DECIMAL_PRECISION),
        cumulative_twr: cumulative_twr.round_dp(DECIMAL_PRECISION),
        annualized_twr: annualized_twr.round_dp(DECIMAL_PRECISION),
        volatility: volatility(&daily_returns).round_dp(DECIMAL_PRECISION),
        max_drawdown: max_drawdown(&daily_returns).round_dp(DECIMAL_PRECISION),
    }
}

/// Market movement over the window, net of external cash flow.
fn period_gain_loss(first: &ValuationPoint, last: &ValuationPoint) -> Decimal {
    (last.total_value - first.total_value) - (last.net_contribution - first.net_contribution)
}

fn all_time_return(last: &ValuationPoint) -> TotalReturn {
    let gain = last.total_value - last.net_contribution;

    if last.net_contribution.is_zero() {
        if !gain.is_zero() {
            warn!(
                "Account '{}': gain of {} with zero net contribution on {}. Returning 0 ratio.",
                last.account_id, gain, last.valuation_date
            );
        }
        return TotalReturn {
            gain_loss_amount: gain,
            return_ratio: Decimal::ZERO,
        };
    }

    TotalReturn {
        gain_loss_amount: gain,
        return_ratio: gain.checked_div(last.net_contribution).unwrap_or_else(|| {
            warn!(
                "Account '{}': all-time return overflowed. Returning 0 ratio.",
                last.account_id
            );
            Decimal::ZERO
        }),
    }
}

/// Daily returns for every consecutive pair, keyed by the later date.
///
/// A step is `None` when the previous value is zero (account just opened) or
/// the ratio cannot be represented; such steps stay out of the chained product.
fn chained_daily_returns(history: &[ValuationPoint]) -> Vec<(NaiveDate, Option<Decimal>)> {
    history
        .windows(2)
        .map(|window| {
            let (prev, curr) = (&window[0], &window[1]);
            (curr.valuation_date, daily_return(prev, curr))
        })
        .collect()
}

fn daily_return(prev: &ValuationPoint, curr: &ValuationPoint) -> Option<Decimal> {
    if prev.total_value.is_zero() {
        debug!(
            "Account '{}': zero value on {}, skipping step to {}",
            curr.account_id, prev.valuation_date, curr.valuation_date
        );
        return None;
    }

    let cash_flow = curr.net_contribution - prev.net_contribution;
    let factor = (curr.total_value - cash_flow).checked_div(prev.total_value);
    if factor.is_none() {
        warn!(
            "Account '{}': return factor on {} overflowed, skipping step",
            curr.account_id, curr.valuation_date
        );
    }
    factor.map(|f| f - Decimal::ONE)
}

fn compound(cumulative: Decimal, daily_return: Decimal) -> Decimal {
    cumulative
        .checked_mul(Decimal::ONE + daily_return)
        .unwrap_or_else(|| {
            warn!("Cumulative return overflowed, ignoring step");
            cumulative
        })
}

fn annualized_return(start_date: NaiveDate, end_date: NaiveDate, total_return: Decimal) -> Decimal {
    if start_date > end_date {
        return Decimal::ZERO;
    }

    // A total loss has no meaningful geometric annualization.
    if total_return <= dec!(-1.0) {
        return dec!(-1.0);
    }

    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return total_return;
    }

    let years = Decimal::from(days) / DAYS_PER_YEAR_DECIMAL;
    if years < Decimal::ONE {
        return total_return;
    }

    let base = Decimal::ONE + total_return;
    base.checked_powd(Decimal::ONE / years)
        .map(|growth| growth - Decimal::ONE)
        .unwrap_or(total_return)
}

/// Annualized sample standard deviation of the daily returns.
///
/// Zero for fewer than two returns, or when the dispersion is too large to
/// represent.
fn volatility(daily_returns: &[Decimal]) -> Decimal {
    if daily_returns.len() < 2 {
        return Decimal::ZERO;
    }

    let annualization_factor = Decimal::from(TRADING_DAYS_PER_YEAR)
        .sqrt()
        .unwrap_or(SQRT_TRADING_DAYS_APPROX);

    sample_variance(daily_returns)
        .and_then(|variance| variance.sqrt())
        .and_then(|daily| daily.checked_mul(annualization_factor))
        .unwrap_or_else(|| {
            warn!(
                "Volatility of {} daily returns overflowed. Returning 0.",
                daily_returns.len()
            );
            Decimal::ZERO
        })
}

fn sample_variance(values: &[Decimal]) -> Option<Decimal> {
    let count = Decimal::from(values.len());
    let mean = values
        .iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))?
        .checked_div(count)?;

    values
        .iter()
        .try_fold(Decimal::ZERO, |total, value| {
            let deviation = value.checked_sub(mean)?;
            total.checked_add(deviation.checked_mul(deviation)?)
        })?
        .checked_div(count - Decimal::ONE)
}

/// Largest peak-to-trough decline of the chained growth curve, as a ratio.
fn max_drawdown(daily_returns: &[Decimal]) -> Decimal {
    let mut growth = Decimal::ONE;
    let mut peak = Decimal::ONE;
    let mut deepest = Decimal::ZERO;

    for &daily_return in daily_returns {
        growth = compound(growth, daily_return);
        peak = peak.max(growth);

        // peak starts at one and never decreases
        match peak.checked_sub(growth).and_then(|fall| fall.checked_div(peak)) {
            Some(drawdown) => deepest = deepest.max(drawdown),
            None => warn!("Drawdown from peak {} overflowed, ignoring step", peak),
        }
    }

    deepest
}
