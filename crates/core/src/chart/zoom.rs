use serde::{Deserialize, Serialize};

/// Visible part of the full time axis, as percentages `[start, end]` of its
/// width. `[0, 100]` is the full range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub start_pct: f64,
    pub end_pct: f64,
}

impl ViewWindow {
    pub fn new(start_pct: f64, end_pct: f64) -> Self {
        Self { start_pct, end_pct }
    }

    pub fn full() -> Self {
        Self::new(0.0, 100.0)
    }

    /// Index range `floor(start% × n) .. ceil(end% × n)` clamped to `0..=n`.
    /// `None` when the window selects no points.
    pub fn index_range(&self, n: usize) -> Option<std::ops::Range<usize>> {
        if n == 0 || !self.start_pct.is_finite() || !self.end_pct.is_finite() {
            return None;
        }
        let len = n as f64;
        let start = (self.start_pct / 100.0 * len).floor().clamp(0.0, len) as usize;
        let end = (self.end_pct / 100.0 * len).ceil().clamp(0.0, len) as usize;
        (start < end).then_some(start..end)
    }
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self::full()
    }
}

/// Pan/zoom state of the time axis: screen `x' = k·x + x_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    /// Scale factor (1 = full range)
    pub k: f64,
    /// Horizontal translation in pixels
    pub x: f64,
}

impl ZoomTransform {
    pub fn identity() -> Self {
        Self { k: 1.0, x: 0.0 }
    }

    pub fn new(k: f64, x: f64) -> Self {
        Self { k, x }
    }

    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.k + self.x
    }

    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    /// Clamp `k` to `[min_k, max_k]` and keep `[0, width]` covered, so the
    /// chart can never be panned past either end of the data.
    pub fn constrained(&self, width: f64, min_k: f64, max_k: f64) -> Self {
        // An inverted extent collapses to its lower bound; k stays positive
        let lo = min_k.max(f64::EPSILON);
        let hi = max_k.max(lo);
        let k = if self.k.is_finite() {
            self.k.max(lo).min(hi)
        } else {
            lo
        };
        let lowest = width * (1.0 - k);
        let x = if self.x.is_finite() {
            self.x.clamp(lowest.min(0.0), 0.0)
        } else {
            0.0
        };
        Self { k, x }
    }

    /// Multiply the scale by `factor`, keeping the data under `anchor_x`
    /// in place.
    pub fn zoomed_at(&self, factor: f64, anchor_x: f64) -> Self {
        let anchored = self.invert_x(anchor_x);
        let k = self.k * factor;
        Self {
            k,
            x: anchor_x - anchored * k,
        }
    }

    pub fn panned(&self, dx: f64) -> Self {
        Self {
            k: self.k,
            x: self.x + dx,
        }
    }

    /// Visible window over a plot of `width` pixels.
    pub fn window(&self, width: f64) -> ViewWindow {
        if width <= 0.0 {
            return ViewWindow::full();
        }
        let start = self.invert_x(0.0) / width * 100.0;
        let end = self.invert_x(width) / width * 100.0;
        ViewWindow::new(start, end)
    }

    /// Transform showing exactly `window` over a plot of `width` pixels.
    pub fn from_window(window: ViewWindow, width: f64) -> Self {
        let span = window.end_pct - window.start_pct;
        if span <= 0.0 || width <= 0.0 {
            return Self::identity();
        }
        let k = 100.0 / span;
        Self {
            k,
            x: -window.start_pct / 100.0 * width * k,
        }
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Wheel delta (pixels, positive = scroll down) → zoom factor.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    2f64.powf(-delta_y * 0.002)
}
