use serde::{Deserialize, Serialize};

use super::market_cap::MarketCapObservation;
use super::price::PriceObservation;
use super::purchase::PurchaseEvent;

/// The three pre-fetched datasets the chart is built from.
///
/// Produced out-of-band by the acquisition pipeline and written to disk as
/// three JSON files. Loaded once; never refreshed during a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Equity market cap per trading day, ascending, unique dates
    pub market_caps: Vec<MarketCapObservation>,

    /// BTC daily closes, unique dates (any order)
    pub prices: Vec<PriceObservation>,

    /// BTC purchase ledger (any order)
    pub purchases: Vec<PurchaseEvent>,
}

impl Snapshot {
    pub fn new(
        market_caps: Vec<MarketCapObservation>,
        prices: Vec<PriceObservation>,
        purchases: Vec<PurchaseEvent>,
    ) -> Self {
        Self {
            market_caps,
            prices,
            purchases,
        }
    }
}
