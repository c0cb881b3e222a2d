//! Goals domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Target in the reporting currency. Zero is allowed.
    pub target_amount: f64,
    pub is_achieved: bool,
}

/// Domain model for goal-account allocation.
///
/// Allocations of one goal are not required to sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalsAllocation {
    pub id: String,
    pub goal_id: String,
    pub account_id: String,
    pub percent_allocation: i32,
}

/// Progress of a single goal, derived from current account valuations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub target_value: Decimal,
    pub current_value: Decimal,
    /// `current_value / target_value`, unclamped. Zero when the target is zero.
    pub progress: Decimal,
    pub currency: String,
}
