use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::chart::AlignedPoint;

/// Time axis positions are days since 0001-01-01 (proleptic Gregorian).
pub fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Inverse of [`day_number`], rounded to the nearest whole day.
pub fn date_from_day_number(day: f64) -> Option<NaiveDate> {
    if !day.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
}

/// A closed numeric interval `[min, max]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Zero, negative or non-finite width.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.width().is_finite())
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Extend both ends by `fraction` of the width.
    pub fn padded(&self, fraction: f64) -> Self {
        let padding = self.width() * fraction;
        Self::new(self.min - padding, self.max + padding)
    }

    /// Raise both ends to at least `floor`.
    pub fn floored_at(&self, floor: f64) -> Self {
        Self::new(self.min.max(floor), self.max.max(floor))
    }

    /// Widen a degenerate domain by `half_width` on each side; a usable
    /// domain is returned unchanged.
    pub fn guarded(&self, half_width: f64) -> Self {
        if !self.is_degenerate() {
            return *self;
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Self::new(-half_width, half_width);
        }
        Self::new(self.min - half_width, self.max + half_width)
    }

    /// Smallest domain containing every finite value, or `None` if there
    /// are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Domain>, v| match acc {
                None => Some(Domain::new(v, v)),
                Some(d) => Some(Domain::new(d.min.min(v), d.max.max(v))),
            })
    }
}

/// Domains of the three chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomains {
    /// Shared time axis, in day numbers
    pub time: Domain,
    /// Absolute USD axis (market cap, holdings value)
    pub value: Domain,
    /// Premium/discount axis, in percent
    pub ratio: Domain,
}

/// Minimum half-width used when a value-axis domain collapses to a point.
pub(crate) fn value_guard(domain: &Domain) -> f64 {
    (domain.max.abs() * 0.05).max(1.0)
}

/// `[first date, last date]` of the full series, ±1 day when it has fewer
/// than two distinct dates. An empty series gets an arbitrary 2-day span.
pub fn full_time_domain(series: &[AlignedPoint]) -> Domain {
    Domain::spanning(series.iter().map(|p| day_number(p.date)))
        .unwrap_or(Domain::new(0.0, 0.0))
        .guarded(1.0)
}

/// `[0, max(market cap, holdings value)]` over the full series.
pub fn full_value_domain(series: &[AlignedPoint]) -> Domain {
    let max = series
        .iter()
        .map(AlignedPoint::max_value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let domain = Domain::new(0.0, max);
    domain.guarded(value_guard(&domain)).floored_at(0.0)
}

/// `[-max|ratio|, +max|ratio|]` over the full series, centred on zero.
pub fn full_ratio_domain(series: &[AlignedPoint]) -> Domain {
    let max_abs = series
        .iter()
        .map(|p| p.ratio.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    Domain::new(-max_abs, max_abs).guarded(1.0)
}

/// Full-range fit of all three axes, used for the initial render and reset.
pub fn initial_domains(series: &[AlignedPoint]) -> AxisDomains {
    AxisDomains {
        time: full_time_domain(series),
        value: full_value_domain(series),
        ratio: full_ratio_domain(series),
    }
}
