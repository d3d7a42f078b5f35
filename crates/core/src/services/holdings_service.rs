use chrono::NaiveDate;

use crate::models::purchase::PurchaseEvent;

/// Cumulative BTC units held as of `as_of` (inclusive).
///
/// Straight scan over the ledger, O(ledger) per call. Ledger order does not
/// matter. Use [`HoldingsAccumulator`] when querying many dates.
pub fn cumulative_units(as_of: NaiveDate, ledger: &[PurchaseEvent]) -> f64 {
    ledger
        .iter()
        .filter(|p| p.date <= as_of)
        .map(|p| p.amount)
        .sum()
}

/// Pre-indexed purchase ledger answering "units held on date" in O(log n).
///
/// Built once from a ledger in any order: purchases are sorted ascending,
/// same-day purchases are merged, and a running prefix sum is kept per day.
#[derive(Debug, Clone, Default)]
pub struct HoldingsAccumulator {
    /// Distinct purchase dates, ascending
    dates: Vec<NaiveDate>,
    /// `totals[i]` = units held at the end of `dates[i]`
    totals: Vec<f64>,
}

impl HoldingsAccumulator {
    pub fn new(ledger: &[PurchaseEvent]) -> Self {
        let mut sorted: Vec<&PurchaseEvent> = ledger.iter().collect();
        sorted.sort_by_key(|p| p.date);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(sorted.len());
        let mut totals: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut running = 0.0;

        for purchase in sorted {
            running += purchase.amount;
            match dates.last() {
                Some(&last) if last == purchase.date => {
                    if let Some(total) = totals.last_mut() {
                        *total = running;
                    }
                }
                _ => {
                    dates.push(purchase.date);
                    totals.push(running);
                }
            }
        }

        log::debug!(
            "Indexed {} purchases over {} distinct dates ({} units total)",
            ledger.len(),
            dates.len(),
            running
        );

        Self { dates, totals }
    }

    /// Units held at the end of `as_of`. Purchases dated `as_of` are included.
    pub fn units_as_of(&self, as_of: NaiveDate) -> f64 {
        let idx = self.dates.partition_point(|d| *d <= as_of);
        idx.checked_sub(1).map_or(0.0, |i| self.totals[i])
    }

    /// Units held after every purchase in the ledger.
    pub fn total_units(&self) -> f64 {
        self.totals.last().copied().unwrap_or(0.0)
    }

    /// Date of the first purchase, if any.
    pub fn first_purchase(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_day_purchases_are_merged() {
        let ledger = vec![
            PurchaseEvent::units(d(2021, 2, 1), 3.0),
            PurchaseEvent::units(d(2021, 1, 1), 1.0),
            PurchaseEvent::units(d(2021, 2, 1), 2.0),
        ];
        let acc = HoldingsAccumulator::new(&ledger);
        assert_eq!(acc.dates, vec![d(2021, 1, 1), d(2021, 2, 1)]);
        assert_eq!(acc.totals, vec![1.0, 6.0]);
    }
}
