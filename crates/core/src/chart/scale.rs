use chrono::{Datelike, Months, NaiveDate};

use super::domain::{date_from_day_number, day_number, Domain};
use super::zoom::ZoomTransform;

/// Linear mapping from a data domain to a pixel range.
///
/// Scales are cheap values: zoom builds a new one instead of touching the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Domain,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Data value → pixel. A degenerate domain maps everything to the middle
    /// of the range.
    pub fn map(&self, v: f64) -> f64 {
        let (r0, r1) = self.range;
        if self.domain.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - self.domain.min) / self.domain.width() * (r1 - r0)
    }

    /// Pixel → data value.
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        if r1 == r0 {
            return self.domain.min;
        }
        self.domain.min + (px - r0) / (r1 - r0) * self.domain.width()
    }

    /// Roughly `count` evenly spaced round values inside the domain
    /// (steps of 1, 2 or 5 × 10ⁿ).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 || self.domain.is_degenerate() {
            return vec![self.domain.min];
        }
        let step = tick_step(self.domain.width(), count);
        let start = (self.domain.min / step).ceil() as i64;
        let stop = (self.domain.max / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }
}

fn tick_step(span: f64, count: usize) -> f64 {
    let raw = span / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Spacing between two time-axis ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickInterval {
    Days(u32),
    Months(u32),
}

impl TickInterval {
    fn approx_days(&self) -> f64 {
        match self {
            TickInterval::Days(n) => f64::from(*n),
            TickInterval::Months(n) => f64::from(*n) * 30.44,
        }
    }

    /// Label format matching the interval granularity.
    pub fn label_format(&self) -> &'static str {
        match self {
            TickInterval::Days(_) => "%b %d",
            TickInterval::Months(_) => "%b %Y",
        }
    }
}

const TICK_INTERVALS: [TickInterval; 11] = [
    TickInterval::Days(1),
    TickInterval::Days(2),
    TickInterval::Days(7),
    TickInterval::Days(14),
    TickInterval::Months(1),
    TickInterval::Months(2),
    TickInterval::Months(3),
    TickInterval::Months(6),
    TickInterval::Months(12),
    TickInterval::Months(24),
    TickInterval::Months(60),
];

/// Time axis: calendar dates ↔ pixels, over day numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new(domain, range),
        }
    }

    pub fn domain(&self) -> Domain {
        self.inner.domain()
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn map_date(&self, date: NaiveDate) -> f64 {
        self.inner.map(day_number(date))
    }

    /// Pixel → fractional day number.
    pub fn invert_day(&self, px: f64) -> f64 {
        self.inner.invert(px)
    }

    /// Pixel → nearest calendar date.
    pub fn invert_date(&self, px: f64) -> Option<NaiveDate> {
        date_from_day_number(self.invert_day(px))
    }

    /// Same range, domain narrowed to what `transform` shows.
    pub fn rescaled(&self, transform: &ZoomTransform) -> Self {
        let (r0, r1) = self.range();
        let d0 = self.inner.invert(transform.invert_x(r0));
        let d1 = self.inner.invert(transform.invert_x(r1));
        Self::new(Domain::new(d0, d1), self.range())
    }

    /// Smallest interval giving at most `count` ticks over the domain.
    pub fn tick_interval(&self, count: usize) -> TickInterval {
        let span = self.domain().width().max(1.0);
        let count = count.max(1) as f64;
        TICK_INTERVALS
            .iter()
            .copied()
            .find(|i| span / i.approx_days() <= count)
            .unwrap_or(TickInterval::Months(120))
    }

    /// Tick dates inside the domain, aligned to day or month boundaries.
    pub fn ticks(&self, count: usize) -> (TickInterval, Vec<NaiveDate>) {
        let interval = self.tick_interval(count);
        let domain = self.domain();
        let (Some(first), Some(last)) = (
            date_from_day_number(domain.min.ceil()),
            date_from_day_number(domain.max.floor()),
        ) else {
            return (interval, Vec::new());
        };

        let mut ticks = Vec::new();
        match interval {
            TickInterval::Days(step) => {
                let mut current = first;
                while current <= last {
                    ticks.push(current);
                    match current.checked_add_days(chrono::Days::new(u64::from(step))) {
                        Some(next) => current = next,
                        None => break,
                    }
                }
            }
            TickInterval::Months(step) => {
                let month_index = first.year() * 12 + first.month0() as i32;
                let aligned = month_index + (step as i32 - month_index.rem_euclid(step as i32))
                    % step as i32;
                let mut current =
                    NaiveDate::from_ymd_opt(aligned.div_euclid(12), aligned.rem_euclid(12) as u32 + 1, 1);
                if current.is_some_and(|c| c < first) {
                    current = current.and_then(|c| c.checked_add_months(Months::new(step)));
                }
                while let Some(date) = current {
                    if date > last {
                        break;
                    }
                    ticks.push(date);
                    current = date.checked_add_months(Months::new(step));
                }
            }
        }
        (interval, ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_step_picks_round_values() {
        assert_eq!(tick_step(100.0, 10), 10.0);
        assert_eq!(tick_step(100.0, 5), 20.0);
        assert_eq!(tick_step(1000.0, 4), 200.0);
    }
}
