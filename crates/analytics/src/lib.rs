//! Wealthfolio Analytics - portfolio returns, goal progress and manual quote editing.
//!
//! This crate holds the computational core behind the portfolio views: it
//! consumes valuation histories produced by the valuation engine and performs
//! no I/O of its own. Edit sessions reach storage only through the
//! caller-supplied [`editing::RecordStore`].

pub mod constants;
pub mod editing;
pub mod errors;
pub mod goals;
pub mod portfolio;
pub mod quotes;

// Re-export common types from the portfolio modules
pub use portfolio::performance::*;
pub use portfolio::valuation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
