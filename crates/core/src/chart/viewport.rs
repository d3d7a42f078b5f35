use std::ops::Range;

use crate::models::chart::AlignedPoint;

use super::domain::{value_guard, AxisDomains, Domain};
use super::zoom::ViewWindow;

/// Result of handling one zoom/pan event.
#[derive(Debug, Clone, PartialEq)]
pub enum RescaleOutcome {
    /// Domains were refit to the points in this index range.
    Applied(Range<usize>),
    /// The window selected no points; previous domains were kept.
    Unchanged,
}

/// Fits the value and ratio axes to the points inside the visible window.
///
/// Holds the view-window state only. The aligned series is passed in on
/// every event and is never modified or recomputed.
#[derive(Debug, Clone)]
pub struct ViewportRescaler {
    padding_fraction: f64,
    window: ViewWindow,
    value: Domain,
    ratio: Domain,
}

impl ViewportRescaler {
    /// Start in the full-range state with the given initial domains.
    pub fn new(initial: &AxisDomains, padding_fraction: f64) -> Self {
        Self {
            padding_fraction,
            window: ViewWindow::full(),
            value: initial.value,
            ratio: initial.ratio,
        }
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    pub fn value_domain(&self) -> Domain {
        self.value
    }

    pub fn ratio_domain(&self) -> Domain {
        self.ratio
    }

    /// Back to the full-range state.
    pub fn reset(&mut self, initial: &AxisDomains) {
        self.window = ViewWindow::full();
        self.value = initial.value;
        self.ratio = initial.ratio;
    }

    /// Handle a zoom/pan event carrying the new visible window.
    ///
    /// Value axis: `[min − pad, max + pad]` over both USD series, floored at 0.
    /// Ratio axis: same indices, its own min/max and padding.
    /// `pad = (max − min) × padding_fraction`.
    pub fn rescale(&mut self, series: &[AlignedPoint], window: ViewWindow) -> RescaleOutcome {
        let Some(range) = window.index_range(series.len()) else {
            log::debug!("View window {window:?} selects no points; keeping axis domains");
            return RescaleOutcome::Unchanged;
        };
        self.window = window;
        let visible = &series[range.clone()];

        let value_span = Domain::spanning(
            visible
                .iter()
                .flat_map(|p| [p.market_cap, p.holdings_value]),
        );
        let ratio_span = Domain::spanning(visible.iter().map(|p| p.ratio));

        if let Some(span) = value_span {
            let padded = span.padded(self.padding_fraction);
            self.value = padded.guarded(value_guard(&padded)).floored_at(0.0);
        }
        if let Some(span) = ratio_span {
            self.ratio = span.padded(self.padding_fraction).guarded(1.0);
        }

        log::debug!(
            "Rescaled to points {}..{}: value {:?}, ratio {:?}",
            range.start,
            range.end,
            self.value,
            self.ratio
        );
        RescaleOutcome::Applied(range)
    }
}
