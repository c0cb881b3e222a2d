//! Manually entered quotes and their edit session.

mod draft;
mod model;

pub use draft::{manual_quote_session, ManualQuoteSession, QuoteDraftFactory};
pub use model::{manual_quote_id, QuoteRow};
