use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PriceObservation;
use crate::models::series::SeriesKind;

/// Trait abstraction for daily-history data sources.
///
/// Each upstream API (CryptoCompare, Yahoo Finance) implements this trait.
/// If an API stops working or changes, only that implementation is replaced.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which series kinds this provider can supply.
    fn supported_series(&self) -> Vec<SeriesKind>;

    /// Daily closing values of `symbol` for every available day in
    /// `[from, to]` (inclusive), in USD, sorted ascending by date.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceObservation>, CoreError>;
}
