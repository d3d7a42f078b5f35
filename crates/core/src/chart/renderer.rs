use crate::models::chart::AlignedPoint;
use crate::models::settings::ChartSettings;

use super::domain::{initial_domains, AxisDomains};
use super::scale::{LinearScale, TimeScale};
use super::surface::{LineStyle, Rect, RenderSurface, SvgSurface, TextAnchor, TextStyle};
use super::tooltip::{nearest_index, TooltipState};
use super::viewport::{RescaleOutcome, ViewportRescaler};
use super::zoom::{wheel_zoom_factor, ViewWindow, ZoomTransform};

const AXIS_COLOR: &str = "#333";
const LABEL_SIZE: f64 = 11.0;
const TICK_LENGTH: f64 = 6.0;
const LEGEND_SPACING: f64 = 250.0;
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;

/// Draws the aligned series as three lines over one time axis and two value
/// axes, and owns all interaction state for one chart instance.
///
/// The series is fixed at construction. Events only change the zoom
/// transform, the axis domains and the tooltip; lines are re-projected
/// through fresh scales on every `render`.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    settings: ChartSettings,
    series: Vec<AlignedPoint>,
    initial: AxisDomains,
    transform: ZoomTransform,
    rescaler: ViewportRescaler,
    tooltip: TooltipState,
}

impl ChartRenderer {
    pub fn new(series: Vec<AlignedPoint>, settings: ChartSettings) -> Self {
        let initial = initial_domains(&series);
        let rescaler = ViewportRescaler::new(&initial, settings.padding_fraction);
        Self {
            settings,
            series,
            initial,
            transform: ZoomTransform::identity(),
            rescaler,
            tooltip: TooltipState::hidden(),
        }
    }

    pub fn series(&self) -> &[AlignedPoint] {
        &self.series
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Full-series fit computed at construction.
    pub fn initial_domains(&self) -> AxisDomains {
        self.initial
    }

    /// Domains currently in effect (time domain reflects the zoom).
    pub fn current_domains(&self) -> AxisDomains {
        AxisDomains {
            time: self.time_scale().domain(),
            value: self.rescaler.value_domain(),
            ratio: self.rescaler.ratio_domain(),
        }
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn window(&self) -> ViewWindow {
        self.rescaler.window()
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    // ── Scales ──────────────────────────────────────────────────────

    fn base_time_scale(&self) -> TimeScale {
        TimeScale::new(self.initial.time, (0.0, self.settings.plot_width()))
    }

    /// Time scale with the current zoom applied.
    pub fn time_scale(&self) -> TimeScale {
        self.base_time_scale().rescaled(&self.transform)
    }

    pub fn value_scale(&self) -> LinearScale {
        LinearScale::new(
            self.rescaler.value_domain(),
            (self.settings.plot_height(), 0.0),
        )
    }

    pub fn ratio_scale(&self) -> LinearScale {
        LinearScale::new(
            self.rescaler.ratio_domain(),
            (self.settings.plot_height(), 0.0),
        )
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Zoom/pan event expressed as a visible window of the time axis.
    /// The window is constrained like any other zoom, so the value axes are
    /// fitted to what the time axis actually shows. An empty window leaves
    /// the transform and all domains as they were.
    pub fn on_view_window(&mut self, window: ViewWindow) -> RescaleOutcome {
        if window.index_range(self.series.len()).is_none() {
            log::debug!("View window {window:?} selects no points; keeping view");
            return RescaleOutcome::Unchanged;
        }
        let width = self.settings.plot_width();
        self.on_zoom(ZoomTransform::from_window(window, width))
    }

    /// Zoom/pan event expressed as a raw transform (e.g., from a gesture).
    pub fn on_zoom(&mut self, transform: ZoomTransform) -> RescaleOutcome {
        let width = self.settings.plot_width();
        self.transform =
            transform.constrained(width, self.settings.min_zoom, self.settings.max_zoom);
        self.rescale_to(self.transform.window(width))
    }

    /// Mouse wheel over the plot, anchored at `cursor_x` (plot coordinates).
    pub fn on_wheel(&mut self, delta_y: f64, cursor_x: f64) -> RescaleOutcome {
        let next = self
            .transform
            .zoomed_at(wheel_zoom_factor(delta_y), cursor_x);
        self.on_zoom(next)
    }

    /// Drag by `dx` pixels.
    pub fn on_drag(&mut self, dx: f64) -> RescaleOutcome {
        let next = self.transform.panned(dx);
        self.on_zoom(next)
    }

    /// Back to the initial full-range state.
    pub fn reset(&mut self) {
        self.transform = ZoomTransform::identity();
        self.rescaler.reset(&self.initial);
        self.tooltip = TooltipState::hidden();
    }

    fn rescale_to(&mut self, window: ViewWindow) -> RescaleOutcome {
        let outcome = self.rescaler.rescale(&self.series, window);
        self.refresh_guide();
        outcome
    }

    /// Keep the hover guide on its point after the time scale moved.
    fn refresh_guide(&mut self) {
        let scale = self.time_scale();
        let guide_x = self
            .tooltip
            .index
            .and_then(|i| self.series.get(i))
            .map(|p| scale.map_date(p.date));
        if let (true, Some(x)) = (self.tooltip.visible, guide_x) {
            self.tooltip.guide_x = x;
        }
    }

    /// Pointer moved to `(x, y)` in plot coordinates. Shows the tooltip for
    /// the nearest point, or hides it if the series is empty.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> &TooltipState {
        let scale = self.time_scale();
        let day = scale.invert_day(x);
        match nearest_index(&self.series, day) {
            Some(index) => {
                let point = &self.series[index];
                let (dx, dy) = self.settings.tooltip_offset;
                self.tooltip = TooltipState {
                    visible: true,
                    x: x + dx,
                    y: y + dy,
                    index: Some(index),
                    guide_x: scale.map_date(point.date),
                    lines: TooltipState::lines_for(
                        point,
                        &self.settings.equity_label,
                        &self.settings.asset_label,
                    ),
                };
            }
            None => self.tooltip = TooltipState::hidden(),
        }
        &self.tooltip
    }

    pub fn on_pointer_leave(&mut self) {
        self.tooltip = TooltipState::hidden();
    }

    // ── Drawing ─────────────────────────────────────────────────────

    /// Paint the current state onto `surface`.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let s = &self.settings;
        let (ox, oy) = (s.margins.left, s.margins.top);
        let (w, h) = (s.plot_width(), s.plot_height());
        let time = self.time_scale();
        let value = self.value_scale();
        let ratio = self.ratio_scale();
        let at = |x: f64, y: f64| (ox + x, oy + y);

        surface.begin_frame(s.width, s.height);

        // Lines, clipped to the plot area
        surface.push_clip(Rect::new(ox, oy, w, h));
        let market_cap: Vec<(f64, f64)> = self.project(|p| {
            at(time.map_date(p.date), value.map(p.market_cap))
        });
        let holdings: Vec<(f64, f64)> = self.project(|p| {
            at(time.map_date(p.date), value.map(p.holdings_value))
        });
        let ratio_line: Vec<(f64, f64)> =
            self.project(|p| at(time.map_date(p.date), ratio.map(p.ratio)));
        surface.draw_polyline(&market_cap, &LineStyle::solid(&s.colors.market_cap, 2.0));
        surface.draw_polyline(&holdings, &LineStyle::solid(&s.colors.holdings_value, 2.0));
        surface.draw_polyline(&ratio_line, &LineStyle::solid(&s.colors.ratio, 2.0));

        let zero_y = ratio.map(0.0);
        if (0.0..=h).contains(&zero_y) {
            surface.draw_line(
                at(0.0, zero_y),
                at(w, zero_y),
                &LineStyle::dashed(&s.colors.guide, 1.0, (4.0, 4.0), 0.5),
            );
        }
        surface.pop_clip();

        self.draw_axes(surface, &time, &value, &ratio);
        self.draw_legend(surface);
        self.draw_tooltip(surface);

        surface.end_frame();
    }

    /// Render the current state to a standalone SVG document.
    pub fn render_svg(&self) -> String {
        let mut surface = SvgSurface::new();
        self.render(&mut surface);
        surface.into_string()
    }

    fn project<F>(&self, f: F) -> Vec<(f64, f64)>
    where
        F: Fn(&AlignedPoint) -> (f64, f64),
    {
        self.series
            .iter()
            .map(f)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }

    fn draw_axes(
        &self,
        surface: &mut dyn RenderSurface,
        time: &TimeScale,
        value: &LinearScale,
        ratio: &LinearScale,
    ) {
        let s = &self.settings;
        let (ox, oy) = (s.margins.left, s.margins.top);
        let (w, h) = (s.plot_width(), s.plot_height());
        let axis = LineStyle::solid(AXIS_COLOR, 1.0);

        // Time axis (bottom)
        surface.draw_line((ox, oy + h), (ox + w, oy + h), &axis);
        let (interval, dates) = time.ticks(s.time_ticks);
        let label = TextStyle::new(AXIS_COLOR, LABEL_SIZE, TextAnchor::Middle);
        for date in dates {
            let x = time.map_date(date);
            if !(0.0..=w).contains(&x) {
                continue;
            }
            surface.draw_line((ox + x, oy + h), (ox + x, oy + h + TICK_LENGTH), &axis);
            surface.draw_text(
                (ox + x, oy + h + TICK_LENGTH + LABEL_SIZE + 2.0),
                &date.format(interval.label_format()).to_string(),
                &label,
            );
        }

        // Value axis (left), billions with one decimal
        surface.draw_line((ox, oy), (ox, oy + h), &axis);
        let label = TextStyle::new(AXIS_COLOR, LABEL_SIZE, TextAnchor::End);
        for tick in value.ticks(s.value_ticks) {
            let y = value.map(tick);
            surface.draw_line((ox - TICK_LENGTH, oy + y), (ox, oy + y), &axis);
            surface.draw_text(
                (ox - TICK_LENGTH - 3.0, oy + y + 4.0),
                &format!("${:.1}B", tick / 1e9),
                &label,
            );
        }

        // Ratio axis (right), whole percent
        surface.draw_line((ox + w, oy), (ox + w, oy + h), &axis);
        let label = TextStyle::new(AXIS_COLOR, LABEL_SIZE, TextAnchor::Start);
        for tick in ratio.ticks(s.value_ticks) {
            let y = ratio.map(tick);
            surface.draw_line((ox + w, oy + y), (ox + w + TICK_LENGTH, oy + y), &axis);
            surface.draw_text(
                (ox + w + TICK_LENGTH + 3.0, oy + y + 4.0),
                &format!("{tick:.0}%"),
                &label,
            );
        }

        // Axis titles
        let title = TextStyle::new(AXIS_COLOR, 12.0, TextAnchor::Middle);
        surface.draw_text(
            (ox - s.margins.left + 14.0, oy + h / 2.0),
            "Value (USD)",
            &title.clone().rotated(-90.0),
        );
        surface.draw_text(
            (ox + w + s.margins.right - 8.0, oy + h / 2.0),
            &format!("Premium/Discount to {} Holdings (%)", s.asset_label),
            &title.rotated(90.0),
        );
    }

    fn draw_legend(&self, surface: &mut dyn RenderSurface) {
        let s = &self.settings;
        let entries = [
            (&s.colors.market_cap, format!("{} Market Cap", s.equity_label)),
            (&s.colors.holdings_value, format!("{} Holdings Value", s.asset_label)),
            (
                &s.colors.ratio,
                format!("Market Cap Premium/Discount to {}", s.asset_label),
            ),
        ];
        let y = (s.margins.top - 35.0).max(0.0);
        let text = TextStyle::new(AXIS_COLOR, 12.0, TextAnchor::Start);
        for (i, (color, label)) in entries.iter().enumerate() {
            let x = s.margins.left + i as f64 * LEGEND_SPACING;
            surface.fill_rect(Rect::new(x, y, 19.0, 19.0), color, 1.0);
            surface.draw_text((x + 24.0, y + 14.0), label, &text);
        }
    }

    fn draw_tooltip(&self, surface: &mut dyn RenderSurface) {
        if !self.tooltip.visible {
            return;
        }
        let s = &self.settings;
        let (ox, oy) = (s.margins.left, s.margins.top);
        surface.draw_line(
            (ox + self.tooltip.guide_x, oy),
            (ox + self.tooltip.guide_x, oy + s.plot_height()),
            &LineStyle::dashed(&s.colors.guide, 1.0, (4.0, 4.0), 1.0),
        );

        let longest = self
            .tooltip
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let width = longest as f64 * 7.0 + 16.0;
        let height = self.tooltip.lines.len() as f64 * TOOLTIP_LINE_HEIGHT + 10.0;
        let (x, y) = (ox + self.tooltip.x, oy + self.tooltip.y);
        surface.fill_rect(Rect::new(x, y, width, height), "black", 0.8);

        for (i, line) in self.tooltip.lines.iter().enumerate() {
            let mut style = TextStyle::new("white", 12.0, TextAnchor::Start);
            if i == 0 {
                style = style.bold();
            }
            surface.draw_text(
                (x + 8.0, y + 5.0 + (i as f64 + 1.0) * TOOLTIP_LINE_HEIGHT - 4.0),
                line,
                &style,
            );
        }
    }
}
