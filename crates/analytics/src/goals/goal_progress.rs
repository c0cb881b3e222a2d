use log::{debug, warn};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::{Goal, GoalProgress, GoalsAllocation};
use crate::portfolio::valuation::ValuationPoint;

/// Computes the allocated value and progress of every goal.
///
/// Account values are converted with each valuation's `fx_rate_to_base` and
/// reported in the base currency of the first valuation. Goals come back sorted
/// by ascending target amount (stable for equal targets). Returns an empty list
/// when any input is empty.
pub fn compute_goal_progress(
    valuations: &[ValuationPoint],
    goals: &[Goal],
    allocations: &[GoalsAllocation],
) -> Vec<GoalProgress> {
    let Some(first_valuation) = valuations.first() else {
        return Vec::new();
    };
    if goals.is_empty() || allocations.is_empty() {
        return Vec::new();
    }

    let currency = first_valuation.base_currency.clone();
    if let Some(other) = valuations.iter().find(|v| v.base_currency != currency) {
        debug!(
            "Account '{}' reports in {} but goal progress uses {}",
            other.account_id, other.base_currency, currency
        );
    }

    let account_values: HashMap<&str, Decimal> = valuations
        .iter()
        .map(|v| (v.account_id.as_str(), v.total_value_in_base()))
        .collect();

    let mut allocations_by_goal: HashMap<&str, Vec<&GoalsAllocation>> = HashMap::new();
    for allocation in allocations {
        allocations_by_goal
            .entry(allocation.goal_id.as_str())
            .or_default()
            .push(allocation);
    }

    let mut sorted_goals: Vec<&Goal> = goals.iter().collect();
    sorted_goals.sort_by(|a, b| a.target_amount.total_cmp(&b.target_amount));

    sorted_goals
        .into_iter()
        .map(|goal| {
            let current_value: Decimal = allocations_by_goal
                .get(goal.id.as_str())
                .map(|goal_allocations| {
                    goal_allocations
                        .iter()
                        .map(|allocation| allocated_value(allocation, &account_values))
                        .sum()
                })
                .unwrap_or(Decimal::ZERO);

            let target_value = target_as_decimal(goal);
            let progress = if target_value.is_zero() {
                Decimal::ZERO
            } else {
                current_value
                    .checked_div(target_value)
                    .unwrap_or(Decimal::ZERO)
            };

            GoalProgress {
                goal_id: goal.id.clone(),
                name: goal.title.clone(),
                target_value,
                current_value,
                progress,
                currency: currency.clone(),
            }
        })
        .collect()
}

fn allocated_value(
    allocation: &GoalsAllocation,
    account_values: &HashMap<&str, Decimal>,
) -> Decimal {
    match account_values.get(allocation.account_id.as_str()) {
        Some(value) => *value * Decimal::from(allocation.percent_allocation) / dec!(100),
        None => {
            debug!(
                "Goal '{}' allocates account '{}' which has no valuation",
                allocation.goal_id, allocation.account_id
            );
            Decimal::ZERO
        }
    }
}

fn target_as_decimal(goal: &Goal) -> Decimal {
    Decimal::from_f64(goal.target_amount).unwrap_or_else(|| {
        warn!(
            "Goal '{}' has a non-representable target amount {}",
            goal.id, goal.target_amount
        );
        Decimal::ZERO
    })
}
