use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::market_cap::MarketCapObservation;
use crate::models::price::PriceObservation;
use crate::models::purchase::PurchaseEvent;
use crate::models::series::SeriesKind;
use crate::models::settings::FetchSettings;
use crate::models::snapshot::Snapshot;
use crate::providers::registry::ProviderRegistry;
use crate::storage::format;

use super::alignment_service::AlignmentService;

/// Builds a fresh `Snapshot` from the history providers.
///
/// Runs out-of-band, before any chart is drawn. Requests are sequential;
/// within a series kind, providers are tried in registration order and the
/// first success wins.
pub struct SnapshotService {
    registry: ProviderRegistry,
    settings: FetchSettings,
    ledger: Option<Vec<PurchaseEvent>>,
}

impl SnapshotService {
    pub fn new(registry: ProviderRegistry, settings: FetchSettings) -> Self {
        Self {
            registry,
            settings,
            ledger: None,
        }
    }

    /// Attach this ledger instead of the bundled one.
    pub fn with_ledger(mut self, ledger: Vec<PurchaseEvent>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Names of the providers that would serve `kind`, in fallback order.
    pub fn get_provider_names(&self, kind: SeriesKind) -> Vec<String> {
        self.registry
            .get_providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch everything from the configured start date up to today (UTC).
    pub async fn fetch(&self) -> Result<Snapshot, CoreError> {
        self.fetch_until(chrono::Utc::now().date_naive()).await
    }

    /// Fetch everything from the configured start date up to `to`.
    ///
    /// 1. BTC closes; the series must reach back to the start date.
    /// 2. Equity closes, turned into market cap with the constant share count.
    /// 3. Validate the datasets and attach the purchase ledger.
    pub async fn fetch_until(&self, to: NaiveDate) -> Result<Snapshot, CoreError> {
        let from = self.settings.start_date;
        if to < from {
            return Err(CoreError::ValidationError(format!(
                "End date {to} is before start date {from}"
            )));
        }

        let crypto = &self.settings.crypto_symbol;
        let prices = self
            .fetch_series(SeriesKind::Crypto, crypto, from, to)
            .await?;
        check_coverage(crypto, &prices, from)?;
        log::info!("Fetched {} {crypto} closes", prices.len());

        let equity = &self.settings.equity_symbol;
        let closes = self
            .fetch_series(SeriesKind::Equity, equity, from, to)
            .await?;
        let market_caps = to_market_caps(&closes, self.settings.shares_outstanding);
        log::info!("Fetched {} {equity} closes", market_caps.len());

        let purchases = match &self.ledger {
            Some(ledger) => ledger.clone(),
            None => format::default_ledger()?,
        };

        AlignmentService::validate(&market_caps, &prices, &purchases)?;

        Ok(Snapshot::new(market_caps, prices, purchases))
    }

    /// One series from the first provider that succeeds.
    async fn fetch_series(
        &self,
        kind: SeriesKind,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceObservation>, CoreError> {
        let providers = self.registry.get_providers_for(kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(kind.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.fetch_daily_closes(symbol, from, to).await {
                Ok(points) => {
                    if let Some(bad) = points.iter().find(|p| !p.price.is_finite() || p.price < 0.0) {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid close for {symbol} on {}: {}",
                                bad.date, bad.price
                            ),
                        });
                        continue;
                    }
                    return Ok(sorted_unique(points, |p| p.date));
                }
                Err(e) => {
                    log::warn!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(kind.to_string())))
    }
}

/// Market cap per day as `round(close × shares)`, ascending with unique
/// dates (later entries win on duplicates).
pub fn to_market_caps(closes: &[PriceObservation], shares: f64) -> Vec<MarketCapObservation> {
    let caps: Vec<MarketCapObservation> = closes
        .iter()
        .map(|c| MarketCapObservation::new(c.date, (c.price * shares).round()))
        .collect();
    sorted_unique(caps, |m| m.date)
}

/// Ascending by date; for duplicated dates the last occurrence wins.
fn sorted_unique<T>(mut rows: Vec<T>, date_of: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    // Stable sort keeps input order within a date, so the last of each run wins.
    rows.sort_by_key(|r| date_of(r));
    let mut out: Vec<T> = Vec::with_capacity(rows.len());
    for row in rows {
        match out.last_mut() {
            Some(last) if date_of(last) == date_of(&row) => *last = row,
            _ => out.push(row),
        }
    }
    out
}

fn check_coverage(
    symbol: &str,
    prices: &[PriceObservation],
    required: NaiveDate,
) -> Result<(), CoreError> {
    match prices.first() {
        None => Err(CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
            date: required.to_string(),
        }),
        Some(first) if first.date > required => Err(CoreError::InsufficientHistory {
            symbol: symbol.to_string(),
            earliest: first.date.to_string(),
            required: required.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn duplicate_dates_keep_the_last_entry() {
        let points = vec![
            PriceObservation::new(d(3), 3.0),
            PriceObservation::new(d(1), 1.0),
            PriceObservation::new(d(3), 30.0),
        ];
        let out = sorted_unique(points, |p| p.date);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, d(1));
        assert_eq!(out[1].price, 30.0);
    }

    #[test]
    fn coverage_must_reach_the_start_date() {
        let prices = vec![PriceObservation::new(d(5), 1.0)];
        assert!(check_coverage("BTC", &prices, d(5)).is_ok());
        assert!(matches!(
            check_coverage("BTC", &prices, d(4)),
            Err(CoreError::InsufficientHistory { .. })
        ));
        assert!(matches!(
            check_coverage("BTC", &[], d(4)),
            Err(CoreError::PriceNotAvailable { .. })
        ));
    }
}
