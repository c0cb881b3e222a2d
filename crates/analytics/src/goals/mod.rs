//! Goals module - domain models and progress aggregation.

mod goal_progress;
mod goals_model;

pub use goal_progress::compute_goal_progress;
pub use goals_model::{Goal, GoalProgress, GoalsAllocation};
