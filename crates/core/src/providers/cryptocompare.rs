use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::PriceObservation;
use crate::models::series::SeriesKind;
use crate::models::settings::FetchSettings;
use super::traits::HistoryProvider;

const BASE_URL: &str = "https://min-api.cryptocompare.com/data/v2/histoday";

/// Maximum rows CryptoCompare returns per `histoday` request.
pub const PAGE_ROWS: u32 = 2000;

/// CryptoCompare API provider for daily crypto closes.
///
/// - **Free**: works without an API key; a key raises the rate limit.
/// - **Endpoint**: `/data/v2/histoday?fsym=BTC&tsym=USD&limit=N&toTs=T`
/// - **Paging**: a request returns at most `PAGE_ROWS` days ending at `toTs`,
///   so long ranges are fetched newest page first, walking `toTs` backwards.
pub struct CryptoCompareProvider {
    client: Client,
    api_key: Option<String>,
    quote_currency: String,
}

impl CryptoCompareProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
            quote_currency: "USD".to_string(),
        }
    }

    /// Provider configured from the pipeline settings: the
    /// `"cryptocompare"` API key and the quote currency.
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self::new(settings.api_keys.get("cryptocompare").cloned())
            .with_quote_currency(settings.quote_currency.as_str())
    }

    /// Quote closes in another currency than USD.
    pub fn with_quote_currency(mut self, currency: impl Into<String>) -> Self {
        self.quote_currency = currency.into().to_uppercase();
        self
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        page: &PageRequest,
    ) -> Result<Vec<PriceObservation>, CoreError> {
        let mut query: Vec<(&str, String)> = vec![
            ("fsym", symbol.to_uppercase()),
            ("tsym", self.quote_currency.clone()),
            ("limit", page.limit.to_string()),
            ("toTs", page.to_ts.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }

        let resp = self.client.get(BASE_URL).query(&query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: "CryptoCompare".into(),
                message: format!("HTTP {status} for {symbol} page ending {}", page.to_ts),
            });
        }
        let body = resp.text().await?;
        parse_histoday(&body)
    }
}

impl Default for CryptoCompareProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

/// One `histoday` request: `limit + 1` rows ending at `to_ts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Unix timestamp (seconds) of the last day in the page
    pub to_ts: i64,
    /// CryptoCompare `limit` parameter (rows − 1)
    pub limit: u32,
}

/// Split `[from, to]` into newest-first pages of at most `page_rows` days.
pub fn plan_pages(from: NaiveDate, to: NaiveDate, page_rows: u32) -> Vec<PageRequest> {
    let page_rows = i64::from(page_rows.max(1));
    let mut remaining = (to - from).num_days() + 1;
    let mut cursor = to;
    let mut pages = Vec::new();

    while remaining > 0 {
        let rows = remaining.min(page_rows);
        pages.push(PageRequest {
            to_ts: cursor.and_time(NaiveTime::MIN).and_utc().timestamp(),
            limit: (rows - 1) as u32,
        });
        remaining -= rows;
        match cursor.checked_sub_days(chrono::Days::new(rows as u64)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    pages
}

// ── CryptoCompare API response types ────────────────────────────────

#[derive(Deserialize)]
struct HistodayResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Option<HistodayData>,
}

#[derive(Deserialize)]
struct HistodayData {
    #[serde(rename = "Data", default)]
    data: Vec<HistodayRow>,
}

#[derive(Deserialize)]
struct HistodayRow {
    time: i64, // unix timestamp in seconds
    close: f64,
}

/// Parse a `histoday` body into observations.
///
/// Rows with a non-positive close (days before the pair traded) are dropped.
pub fn parse_histoday(body: &str) -> Result<Vec<PriceObservation>, CoreError> {
    let resp: HistodayResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: "CryptoCompare".into(),
        message: format!("Failed to parse histoday response: {e}"),
    })?;

    if resp.response != "Success" {
        return Err(CoreError::Api {
            provider: "CryptoCompare".into(),
            message: resp.message,
        });
    }

    let rows = resp.data.map(|d| d.data).unwrap_or_default();
    let points = rows
        .iter()
        .filter(|r| r.close.is_finite() && r.close > 0.0)
        .filter_map(|r| {
            let dt = chrono::DateTime::from_timestamp(r.time, 0)?;
            Some(PriceObservation::new(dt.date_naive(), r.close))
        })
        .collect();
    Ok(points)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HistoryProvider for CryptoCompareProvider {
    fn name(&self) -> &str {
        "CryptoCompare"
    }

    fn supported_series(&self) -> Vec<SeriesKind> {
        vec![SeriesKind::Crypto]
    }

    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceObservation>, CoreError> {
        let pages = plan_pages(from, to, PAGE_ROWS);
        log::info!(
            "Fetching {} days of {symbol}/{} closes in {} page(s)",
            (to - from).num_days() + 1,
            self.quote_currency,
            pages.len()
        );

        let mut points = Vec::new();
        for page in &pages {
            let mut rows = self.fetch_page(symbol, page).await?;
            log::debug!("CryptoCompare page ending {} returned {} rows", page.to_ts, rows.len());
            if rows.is_empty() {
                break;
            }
            points.append(&mut rows);
        }

        points.retain(|p| p.date >= from && p.date <= to);
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Ok(points)
    }
}
