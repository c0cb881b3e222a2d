//! Portfolio performance: time-weighted and contribution-based returns.

pub mod performance_model;
mod return_calculator;

pub use performance_model::*;
pub use return_calculator::{
    compute_cumulative_returns, compute_performance_summary, compute_return,
};

#[cfg(test)]
mod return_calculator_tests;
