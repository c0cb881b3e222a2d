//! Portfolio computations over valuation histories.

pub mod performance;
pub mod valuation;
