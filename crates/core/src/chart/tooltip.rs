use serde::{Deserialize, Serialize};

use crate::models::chart::AlignedPoint;

use super::domain::day_number;

/// Index of the point nearest to `day` (a fractional day number).
///
/// Bisects to the first point at or after `day`, then compares it with its
/// predecessor: the later point wins only if it is strictly closer. Positions
/// before the first or after the last point snap to that end.
pub fn nearest_index(series: &[AlignedPoint], day: f64) -> Option<usize> {
    if series.is_empty() || !day.is_finite() {
        return None;
    }
    let idx = series.partition_point(|p| day_number(p.date) < day);
    if idx == 0 {
        return Some(0);
    }
    if idx == series.len() {
        return Some(series.len() - 1);
    }
    let previous = day - day_number(series[idx - 1].date);
    let next = day_number(series[idx].date) - day;
    Some(if previous > next { idx } else { idx - 1 })
}

/// `1234567890.0` → `"$1.23B"`.
pub fn format_billions(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

/// Percentage with one decimal, e.g. `"83.3%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Transient hover overlay owned by one chart instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,

    /// Anchor position (plot coordinates, pointer + offset)
    pub x: f64,
    pub y: f64,

    /// Index of the hovered point in the aligned series
    pub index: Option<usize>,

    /// X position of the hover guide line (plot coordinates)
    pub guide_x: f64,

    /// Text lines, first one is the date
    pub lines: Vec<String>,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Tooltip content for one point.
    pub fn lines_for(point: &AlignedPoint, equity_label: &str, asset_label: &str) -> Vec<String> {
        vec![
            point.date.format("%b %-d, %Y").to_string(),
            format!("{equity_label} Market Cap: {}", format_billions(point.market_cap)),
            format!("{asset_label} Holdings: {}", format_billions(point.holdings_value)),
            format!("Premium/Discount: {}", format_percent(point.ratio)),
        ]
    }
}
