use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::QuoteRow;
use crate::editing::{DraftFactory, EditSession};

/// Creates draft quotes for one asset.
///
/// A draft is dated the day after the latest visible quote and starts at that
/// quote's close, so a batch fills consecutive days. With no visible quotes the
/// draft is dated today (UTC) at a zero price.
#[derive(Debug, Clone)]
pub struct QuoteDraftFactory {
    asset_id: String,
    currency: String,
}

impl QuoteDraftFactory {
    pub fn new(asset_id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            currency: currency.into(),
        }
    }

    fn next_draft(&self, latest: Option<&QuoteRow>, today: NaiveDate) -> QuoteRow {
        match latest {
            Some(latest) => QuoteRow::at_price(
                &self.asset_id,
                latest.date.succ_opt().unwrap_or(latest.date),
                latest.close,
                &self.currency,
            ),
            None => QuoteRow::at_price(&self.asset_id, today, Decimal::ZERO, &self.currency),
        }
    }
}

impl DraftFactory<QuoteRow> for QuoteDraftFactory {
    fn create_draft(&self, visible: &[&QuoteRow]) -> QuoteRow {
        let latest = visible.iter().copied().max_by_key(|quote| quote.date);
        self.next_draft(latest, Utc::now().date_naive())
    }
}

/// Edit session over the manual quotes of a single asset.
pub type ManualQuoteSession = EditSession<QuoteRow>;

/// Opens an edit session over `quotes`, keyed by their stored ids.
pub fn manual_quote_session(
    asset_id: &str,
    currency: &str,
    quotes: Vec<(String, QuoteRow)>,
) -> ManualQuoteSession {
    EditSession::new(quotes, QuoteDraftFactory::new(asset_id, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_draft_follows_latest_quote() {
        let factory = QuoteDraftFactory::new("AAPL", "USD");
        let older = QuoteRow::at_price("AAPL", day("2024-01-10"), dec!(180), "USD");
        let latest = QuoteRow::at_price("AAPL", day("2024-01-12"), dec!(185.5), "USD");

        let draft = factory.create_draft(&[&latest, &older]);

        assert_eq!(draft.date, day("2024-01-13"));
        assert_eq!(draft.close, dec!(185.5));
        assert_eq!(draft.volume, Decimal::ZERO);
        assert_eq!(draft.asset_id, "AAPL");
        assert_eq!(draft.currency, "USD");
    }

    #[test]
    fn test_draft_without_quotes_uses_today() {
        let factory = QuoteDraftFactory::new("AAPL", "USD");

        let draft = factory.next_draft(None, day("2024-05-01"));

        assert_eq!(draft.date, day("2024-05-01"));
        assert_eq!(draft.close, Decimal::ZERO);
    }

    #[test]
    fn test_batch_fills_consecutive_days() {
        let mut session = manual_quote_session(
            "AAPL",
            "USD",
            vec![(
                "AAPL_2024-01-12_MANUAL".to_string(),
                QuoteRow::at_price("AAPL", day("2024-01-12"), dec!(185), "USD"),
            )],
        );

        session.add_draft_batch(3);

        let dates: Vec<NaiveDate> = session
            .local_entries()
            .iter()
            .map(|row| row.record.date)
            .collect();
        assert_eq!(
            dates,
            vec![day("2024-01-12"), day("2024-01-13"), day("2024-01-14"), day("2024-01-15")]
        );
        assert_eq!(session.dirty_count(), 3);
    }
}
