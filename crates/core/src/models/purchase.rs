use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single BTC acquisition reported by the company.
///
/// **Important**: the ledger only models purchases. `amount` is always
/// positive and holdings never decrease. `average_price` and `cost` are
/// carried for display; alignment only uses `date` and `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEvent {
    /// Date of the acquisition (daily granularity)
    pub date: NaiveDate,

    /// Units of BTC acquired
    pub amount: f64,

    /// Average price paid per unit, in USD
    pub average_price: f64,

    /// Total cost of the acquisition, in USD
    pub cost: f64,
}

impl PurchaseEvent {
    pub fn new(date: NaiveDate, amount: f64, average_price: f64, cost: f64) -> Self {
        Self {
            date,
            amount,
            average_price,
            cost,
        }
    }

    /// Purchase with only the fields alignment cares about.
    pub fn units(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, amount, 0.0, 0.0)
    }
}
