use std::collections::HashSet;

use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::chart::AlignedPoint;
use crate::models::market_cap::MarketCapObservation;
use crate::models::price::{PriceLookup, PriceObservation};
use crate::models::purchase::PurchaseEvent;
use crate::models::settings::MissingPricePolicy;
use crate::services::holdings_service::HoldingsAccumulator;

/// Joins the market-cap series, the BTC price series and the purchase ledger
/// into one aligned series.
///
/// Pure: no I/O and no clock. Identical inputs
/// always produce identical output.
pub struct AlignmentService {
    missing_price: MissingPricePolicy,
}

impl AlignmentService {
    pub fn new() -> Self {
        Self {
            missing_price: MissingPricePolicy::default(),
        }
    }

    pub fn with_policy(missing_price: MissingPricePolicy) -> Self {
        Self { missing_price }
    }

    pub fn policy(&self) -> MissingPricePolicy {
        self.missing_price
    }

    /// Produce one `AlignedPoint` per market-cap observation, same order.
    ///
    /// For each trading day:
    /// 1. Look up the BTC price for the same date (missing → policy)
    /// 2. Units held as of that date (inclusive)
    /// 3. `holdings_value = units × price`
    /// 4. Ratio of market cap over holdings value
    ///
    /// The ledger is indexed once, so the whole pass is O(N log L).
    pub fn align(
        &self,
        market_caps: &[MarketCapObservation],
        prices: &[PriceObservation],
        ledger: &[PurchaseEvent],
    ) -> Vec<AlignedPoint> {
        let lookup = PriceLookup::new(prices);
        let holdings = HoldingsAccumulator::new(ledger);
        let mut missing = 0usize;

        let series: Vec<AlignedPoint> = market_caps
            .iter()
            .map(|mc| {
                let price = match lookup.get(mc.date) {
                    Some(price) => price,
                    None => {
                        missing += 1;
                        self.fallback_price(&lookup, mc.date)
                    }
                };
                let holdings_value = holdings.units_as_of(mc.date) * price;
                AlignedPoint::new(mc.date, mc.market_cap, holdings_value)
            })
            .collect();

        if missing > 0 {
            log::warn!(
                "{missing} of {} trading days have no BTC price (policy: {:?})",
                market_caps.len(),
                self.missing_price
            );
        }
        log::debug!(
            "Aligned {} points against {} prices and {} purchases",
            series.len(),
            lookup.len(),
            ledger.len()
        );

        series
    }

    fn fallback_price(&self, lookup: &PriceLookup, date: NaiveDate) -> f64 {
        match self.missing_price {
            MissingPricePolicy::Zero => 0.0,
            MissingPricePolicy::CarryForward => lookup.latest_on_or_before(date).unwrap_or(0.0),
        }
    }

    /// Check the input preconditions the aligner relies on.
    ///
    /// Rules:
    /// - Market-cap dates strictly ascending (no duplicates)
    /// - Price dates unique
    /// - Market caps and prices finite and non-negative
    /// - Purchase amounts finite and positive
    ///
    /// `align` does not call this; the acquisition pipeline and tests do.
    pub fn validate(
        market_caps: &[MarketCapObservation],
        prices: &[PriceObservation],
        ledger: &[PurchaseEvent],
    ) -> Result<(), CoreError> {
        for pair in market_caps.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::ValidationError(format!(
                    "Market-cap dates must be strictly ascending: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        if let Some(mc) = market_caps
            .iter()
            .find(|mc| !mc.market_cap.is_finite() || mc.market_cap < 0.0)
        {
            return Err(CoreError::ValidationError(format!(
                "Market cap on {} must be a non-negative number, got {}",
                mc.date, mc.market_cap
            )));
        }

        let mut seen = HashSet::with_capacity(prices.len());
        for p in prices {
            if !seen.insert(p.date) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate price observation for {}",
                    p.date
                )));
            }
            if !p.price.is_finite() || p.price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Price on {} must be a non-negative number, got {}",
                    p.date, p.price
                )));
            }
        }

        if let Some(p) = ledger
            .iter()
            .find(|p| !p.amount.is_finite() || p.amount <= 0.0)
        {
            return Err(CoreError::ValidationError(format!(
                "Purchase amount on {} must be positive, got {}",
                p.date, p.amount
            )));
        }

        Ok(())
    }
}

impl Default for AlignmentService {
    fn default() -> Self {
        Self::new()
    }
}
