use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

/// What to use as the BTC price on a trading day with no price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPricePolicy {
    /// Price is 0, so holdings value and ratio are 0 for that day.
    #[default]
    Zero,
    /// Reuse the latest earlier price observation (0 if there is none).
    CarryForward,
}

/// Outer margins around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 70.0,
            bottom: 50.0,
            left: 70.0,
        }
    }
}

/// Stroke colours of the chart elements (any SVG/CSS colour string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColors {
    pub market_cap: String,
    pub holdings_value: String,
    pub ratio: String,
    pub guide: String,
}

impl Default for SeriesColors {
    fn default() -> Self {
        Self {
            market_cap: "#8884d8".to_string(),
            holdings_value: "#82ca9d".to_string(),
            ratio: "#ff7f0e".to_string(),
            guide: "#666".to_string(),
        }
    }
}

/// User-configurable chart settings. Every field has a default, so a
/// partial JSON document is enough to override a few of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Outer canvas width in pixels (margins included)
    pub width: f64,

    /// Outer canvas height in pixels (margins included)
    pub height: f64,

    pub margins: Margins,

    pub colors: SeriesColors,

    /// Equity ticker shown in the legend and tooltip (e.g., "MSTR")
    pub equity_label: String,

    /// Treasury asset ticker shown in the legend and tooltip (e.g., "BTC")
    pub asset_label: String,

    /// Fraction of the visible value range added above and below when the
    /// viewport is rescaled.
    pub padding_fraction: f64,

    /// Zoom scale extent `[min, max]` (1 = full range).
    pub min_zoom: f64,
    pub max_zoom: f64,

    /// Approximate tick count on the value and ratio axes.
    pub value_ticks: usize,

    /// Approximate tick count on the time axis.
    pub time_ticks: usize,

    /// Tooltip anchor offset from the pointer, in pixels.
    pub tooltip_offset: (f64, f64),

    pub missing_price: MissingPricePolicy,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 600.0,
            margins: Margins::default(),
            colors: SeriesColors::default(),
            equity_label: "MSTR".to_string(),
            asset_label: "BTC".to_string(),
            padding_fraction: 0.05,
            min_zoom: 1.0,
            max_zoom: 500.0,
            value_ticks: 10,
            time_ticks: 10,
            tooltip_offset: (15.0, -15.0),
            missing_price: MissingPricePolicy::default(),
        }
    }
}

impl ChartSettings {
    /// Width of the plot area (inside the margins), never negative.
    pub fn plot_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    /// Height of the plot area (inside the margins), never negative.
    pub fn plot_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Reject settings the renderer cannot honour: a non-positive or
    /// inverted zoom extent, or a negative padding fraction.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(CoreError::ValidationError(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(CoreError::ValidationError(format!(
                "Zoom extent [{}, {}] is inverted",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.padding_fraction.is_finite() && self.padding_fraction >= 0.0) {
            return Err(CoreError::ValidationError(format!(
                "padding_fraction must be non-negative, got {}",
                self.padding_fraction
            )));
        }
        Ok(())
    }
}

/// Settings for the snapshot acquisition pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// First day the snapshot must cover
    pub start_date: NaiveDate,

    /// Equity ticker (e.g., "MSTR")
    pub equity_symbol: String,

    /// Treasury asset ticker (e.g., "BTC")
    pub crypto_symbol: String,

    /// Quote currency for the crypto closes
    pub quote_currency: String,

    /// Constant share count used to turn equity closes into market cap.
    /// Historical issuance is not modelled.
    pub shares_outstanding: f64,

    /// Optional API keys for providers that accept them.
    /// Keys: provider name (e.g., "cryptocompare").
    pub api_keys: HashMap<String, String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2020, 8, 11).unwrap_or_default(),
            equity_symbol: "MSTR".to_string(),
            crypto_symbol: "BTC".to_string(),
            quote_currency: "USD".to_string(),
            shares_outstanding: 244_000_000.0,
            api_keys: HashMap::new(),
        }
    }
}
