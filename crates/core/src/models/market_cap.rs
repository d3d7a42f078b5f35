use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily market capitalization of the equity (close × shares outstanding).
///
/// The market-cap series drives the chart timeline: the aligned series has
/// exactly one point per observation, in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCapObservation {
    pub date: NaiveDate,
    pub market_cap: f64,
}

impl MarketCapObservation {
    pub fn new(date: NaiveDate, market_cap: f64) -> Self {
        Self { date, market_cap }
    }
}
