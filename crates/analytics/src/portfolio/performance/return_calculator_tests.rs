//! Unit tests for the return calculator.

use super::*;
use crate::portfolio::valuation::ValuationPoint;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn point(date: &str, total_value: Decimal, net_contribution: Decimal) -> ValuationPoint {
    ValuationPoint {
        account_id: "acc-1".to_string(),
        valuation_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        account_currency: "USD".to_string(),
        base_currency: "USD".to_string(),
        fx_rate_to_base: Decimal::ONE,
        total_value,
        net_contribution,
    }
}

// ============================================================================
// compute_return
// ============================================================================

#[test]
fn test_empty_and_single_point_history_returns_zero() {
    let single = vec![point("2024-01-01", dec!(1000), dec!(1000))];

    for mode in [ReturnMode::Period, ReturnMode::AllTime] {
        assert_eq!(compute_return(&[], mode), TotalReturn::default());
        assert_eq!(compute_return(&single, mode), TotalReturn::default());
    }
}

#[test]
fn test_period_return_without_cash_flow() {
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(1100), dec!(1000)),
    ];

    let result = compute_return(&history, ReturnMode::Period);

    assert_eq!(result.return_ratio, dec!(0.1));
    assert_eq!(result.gain_loss_amount, dec!(100));
}

#[test]
fn test_period_return_neutralizes_deposit() {
    // 500 deposited on day two; the account grew 10% on the original 1000.
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(1600), dec!(1500)),
    ];

    let result = compute_return(&history, ReturnMode::Period);

    assert_eq!(result.return_ratio, dec!(0.1));
    assert_eq!(result.gain_loss_amount, dec!(100));
}

#[test]
fn test_period_return_skips_step_after_zero_value() {
    // Day 2 empties the account, day 3 reopens it. The 2 -> 3 step has a zero
    // prior value and must not enter the product.
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(0), dec!(-100)),
        point("2024-01-03", dec!(500), dec!(400)),
        point("2024-01-04", dec!(550), dec!(400)),
    ];

    let result = compute_return(&history, ReturnMode::Period);

    // (1100 / 1000) * (550 / 500)
    assert_eq!(result.return_ratio, dec!(0.21));
    assert_eq!(result.gain_loss_amount, dec!(150));
}

#[test]
fn test_period_return_for_account_opened_in_window() {
    let history = vec![
        point("2024-01-01", dec!(0), dec!(0)),
        point("2024-01-02", dec!(1000), dec!(1000)),
        point("2024-01-03", dec!(1100), dec!(1000)),
    ];

    let result = compute_return(&history, ReturnMode::Period);

    assert_eq!(result.return_ratio, dec!(0.1));
    assert_eq!(result.gain_loss_amount, dec!(100));
}

#[test]
fn test_period_return_all_steps_skipped_is_zero() {
    let history = vec![
        point("2024-01-01", dec!(0), dec!(0)),
        point("2024-01-02", dec!(0), dec!(0)),
    ];

    let result = compute_return(&history, ReturnMode::Period);

    assert_eq!(result, TotalReturn::default());
}

#[test]
fn test_all_time_return_on_contribution() {
    let history = vec![
        point("2024-01-01", dec!(900), dec!(1000)),
        point("2024-06-01", dec!(1200), dec!(1000)),
    ];

    let result = compute_return(&history, ReturnMode::AllTime);

    assert_eq!(result.gain_loss_amount, dec!(200));
    assert_eq!(result.return_ratio, dec!(0.2));
}

#[test]
fn test_all_time_return_with_zero_contribution_is_zero_ratio() {
    let history = vec![
        point("2024-01-01", dec!(0), dec!(0)),
        point("2024-06-01", dec!(500), dec!(0)),
    ];

    let result = compute_return(&history, ReturnMode::AllTime);

    assert_eq!(result.gain_loss_amount, dec!(500));
    assert_eq!(result.return_ratio, Decimal::ZERO);
}

#[test]
fn test_return_mode_deserializes_from_front_end_names() {
    let period: ReturnMode = serde_json::from_str("\"period\"").unwrap();
    let all_time: ReturnMode = serde_json::from_str("\"allTime\"").unwrap();

    assert_eq!(period, ReturnMode::Period);
    assert_eq!(all_time, ReturnMode::AllTime);
    assert_eq!(ReturnMode::default(), ReturnMode::Period);
}

// ============================================================================
// compute_cumulative_returns
// ============================================================================

#[test]
fn test_cumulative_returns_track_chained_return() {
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(1100), dec!(1000)),
        point("2024-01-03", dec!(1210), dec!(1000)),
    ];

    let series = compute_cumulative_returns(&history);

    assert_eq!(series.len(), history.len());
    assert_eq!(series[0].value, Decimal::ZERO);
    assert_eq!(series[1].value, dec!(0.1));
    assert_eq!(series[2].value, dec!(0.21));
    assert_eq!(
        series[2].value,
        compute_return(&history, ReturnMode::Period)
            .return_ratio
            .round_dp(6)
    );
    assert_eq!(series[2].date, history[2].valuation_date);
}

#[test]
fn test_cumulative_returns_repeat_value_on_skipped_step() {
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(0), dec!(-100)),
        point("2024-01-03", dec!(500), dec!(400)),
    ];

    let series = compute_cumulative_returns(&history);

    assert_eq!(series[1].value, dec!(0.1));
    assert_eq!(series[2].value, dec!(0.1));
}

#[test]
fn test_cumulative_returns_empty_history() {
    assert!(compute_cumulative_returns(&[]).is_empty());
}

// ============================================================================
// compute_performance_summary
// ============================================================================

#[test]
fn test_summary_short_history_is_empty() {
    let single = vec![point("2024-01-01", dec!(1000), dec!(1000))];
    assert_eq!(compute_performance_summary(&single), PerformanceSummary::default());
}

#[test]
fn test_summary_max_drawdown_from_peak() {
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(1200), dec!(1000)),
        point("2024-01-03", dec!(900), dec!(1000)),
    ];

    let summary = compute_performance_summary(&history);

    assert_eq!(summary.cumulative_twr, dec!(-0.1));
    // Under a year the annualized figure is the total return itself
    assert_eq!(summary.annualized_twr, dec!(-0.1));
    assert_eq!(summary.max_drawdown, dec!(0.25));
    assert_eq!(summary.gain_loss_amount, dec!(-100));
    assert!(summary.volatility > Decimal::ZERO);
    assert_eq!(summary.period_start_date, Some(history[0].valuation_date));
    assert_eq!(summary.period_end_date, Some(history[2].valuation_date));
}

#[test]
fn test_summary_no_drawdown_when_rising() {
    let history = vec![
        point("2024-01-01", dec!(1000), dec!(1000)),
        point("2024-01-02", dec!(1050), dec!(1000)),
        point("2024-01-03", dec!(1100), dec!(1000)),
    ];

    let summary = compute_performance_summary(&history);

    assert_eq!(summary.max_drawdown, Decimal::ZERO);
}

#[test]
fn test_summary_annualizes_multi_year_return() {
    let history = vec![
        point("2020-01-01", dec!(1000), dec!(1000)),
        point("2022-01-01", dec!(1210), dec!(1000)),
    ];

    let summary = compute_performance_summary(&history);

    assert_eq!(summary.cumulative_twr, dec!(0.21));
    assert!(summary.annualized_twr > dec!(0.099));
    assert!(summary.annualized_twr < dec!(0.1));
    // A single daily return has no dispersion
    assert_eq!(summary.volatility, Decimal::ZERO);
}

#[test]
fn test_summary_survives_extreme_daily_return() {
    let history = vec![
        point("2024-01-01", dec!(1), dec!(0)),
        point("2024-01-02", dec!(1000000000000000), dec!(0)),
        point("2024-01-03", dec!(1000000000000000), dec!(0)),
    ];

    let period = compute_return(&history, ReturnMode::Period);
    let summary = compute_performance_summary(&history);

    assert_eq!(period.return_ratio, dec!(999999999999999));
    assert_eq!(summary.cumulative_twr, period.return_ratio);
    // The squared deviations do not fit in a Decimal
    assert_eq!(summary.volatility, Decimal::ZERO);
    assert_eq!(summary.max_drawdown, Decimal::ZERO);
}
