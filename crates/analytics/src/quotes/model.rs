//! Manually entered quote rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MANUAL_QUOTE_SUFFIX;
use crate::editing::EditableRecord;

/// A daily price quote as edited in the manual price history grid.
///
/// # Fields
///
/// * `asset_id` - Canonical asset identifier (e.g., "SEC:AAPL:XNAS")
/// * `date` - The trading day this quote represents
/// * `open`, `high`, `low`, `close` - Standard OHLC price data
/// * `adjclose` - Split and dividend adjusted closing price
/// * `volume` - Trading volume for the day
/// * `currency` - The currency of the price data (e.g., "USD", "EUR")
/// * `notes` - Optional user notes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRow {
    pub asset_id: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adjclose: Decimal,
    pub volume: Decimal,
    pub currency: String,
    pub notes: Option<String>,
}

impl QuoteRow {
    /// A flat quote where every price equals `price`.
    pub fn at_price(asset_id: &str, date: NaiveDate, price: Decimal, currency: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            adjclose: price,
            volume: Decimal::ZERO,
            currency: currency.to_string(),
            notes: None,
        }
    }
}

/// Deterministic id of a manual quote.
///
/// Format: `{asset_id}_{YYYY-MM-DD}_MANUAL`, matching the quote store's ids.
pub fn manual_quote_id(asset_id: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}",
        asset_id,
        date.format("%Y-%m-%d"),
        MANUAL_QUOTE_SUFFIX
    )
}

impl EditableRecord for QuoteRow {
    fn persisted_id(&self) -> String {
        manual_quote_id(&self.asset_id, self.date)
    }

    /// Compares the date, prices, volume and currency.
    ///
    /// Notes are free text and do not mark a row as edited, so a note-only
    /// change stays local and is not saved until another field changes.
    fn differs_from(&self, previous: &Self) -> bool {
        self.date != previous.date
            || self.open != previous.open
            || self.high != previous.high
            || self.low != previous.low
            || self.close != previous.close
            || self.adjclose != previous.adjclose
            || self.volume != previous.volume
            || self.currency != previous.currency
    }
}
