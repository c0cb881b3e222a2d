/// Decimal precision for return and ratio calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Prefix of locally generated row ids that were never persisted
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Source suffix of manually entered quote ids
pub const MANUAL_QUOTE_SUFFIX: &str = "MANUAL";

/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: u32 = 252;
