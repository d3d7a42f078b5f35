use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single point of the aligned series.
///
/// The core generates these; the frontend only renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedPoint {
    /// Trading day, taken from the market-cap series
    pub date: NaiveDate,

    /// Equity market capitalization in USD
    pub market_cap: f64,

    /// Cumulative BTC held on `date` × BTC price on `date`, in USD
    pub holdings_value: f64,

    /// Premium (positive) or discount (negative) of market cap over
    /// holdings value, in percent. 0 when `holdings_value` is 0.
    pub ratio: f64,
}

impl AlignedPoint {
    /// Build a point, deriving `ratio` from the two values.
    pub fn new(date: NaiveDate, market_cap: f64, holdings_value: f64) -> Self {
        Self {
            date,
            market_cap,
            holdings_value,
            ratio: premium_ratio(market_cap, holdings_value),
        }
    }

    /// The larger of the two USD values (used for the value-axis fit).
    pub fn max_value(&self) -> f64 {
        self.market_cap.max(self.holdings_value)
    }

    /// The smaller of the two USD values.
    pub fn min_value(&self) -> f64 {
        self.market_cap.min(self.holdings_value)
    }
}

/// `((market_cap − holdings_value) / holdings_value) × 100`, or 0 when there
/// is no positive holdings value to compare against.
pub fn premium_ratio(market_cap: f64, holdings_value: f64) -> f64 {
    if holdings_value > 0.0 {
        (market_cap - holdings_value) / holdings_value * 100.0
    } else {
        0.0
    }
}
