use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single daily spot price of the treasury asset (BTC/USD close).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Date-keyed view over a price series, built once per alignment.
///
/// Exact lookups go through a `HashMap` (O(1)). The ascending copy is only
/// used for carry-forward lookups, which need "latest price on or before".
#[derive(Debug, Clone, Default)]
pub struct PriceLookup {
    by_date: HashMap<NaiveDate, f64>,
    ascending: Vec<PriceObservation>,
}

impl PriceLookup {
    /// Build the lookup from a price series in any order.
    /// Duplicate dates are a precondition violation; the last one wins here.
    pub fn new(prices: &[PriceObservation]) -> Self {
        let by_date: HashMap<NaiveDate, f64> =
            prices.iter().map(|p| (p.date, p.price)).collect();

        let mut ascending = prices.to_vec();
        ascending.sort_by_key(|p| p.date);

        Self { by_date, ascending }
    }

    /// Price observed exactly on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.by_date.get(&date).copied()
    }

    /// Most recent price on or before `date`. Uses binary search (O(log n)).
    pub fn latest_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.ascending.partition_point(|p| p.date <= date);
        idx.checked_sub(1).map(|i| self.ascending[i].price)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
