pub mod chart;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chart::renderer::ChartRenderer;
use chart::tooltip::TooltipState;
use chart::viewport::RescaleOutcome;
use chart::zoom::{ViewWindow, ZoomTransform};
use models::chart::AlignedPoint;
use models::settings::ChartSettings;
use models::snapshot::Snapshot;
use services::alignment_service::AlignmentService;
use storage::manager::SnapshotStore;

use errors::CoreError;

/// Main entry point for the treasury chart core library.
///
/// Owns the loaded snapshot, the aligned series (computed once) and the
/// renderer that holds all per-session view state. Frontends forward pointer
/// and zoom events here and draw from `renderer()`.
#[must_use]
pub struct TreasuryChart {
    snapshot: Snapshot,
    renderer: ChartRenderer,
}

impl std::fmt::Debug for TreasuryChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreasuryChart")
            .field("market_caps", &self.snapshot.market_caps.len())
            .field("prices", &self.snapshot.prices.len())
            .field("purchases", &self.snapshot.purchases.len())
            .field("window", &self.renderer.window())
            .finish()
    }
}

impl TreasuryChart {
    /// Align the snapshot and build the full-range chart.
    ///
    /// The datasets are trusted; use `from_snapshot_checked` at an input
    /// boundary.
    pub fn from_snapshot(snapshot: Snapshot, settings: ChartSettings) -> Self {
        let series = AlignmentService::with_policy(settings.missing_price).align(
            &snapshot.market_caps,
            &snapshot.prices,
            &snapshot.purchases,
        );
        let renderer = ChartRenderer::new(series, settings);
        Self { snapshot, renderer }
    }

    /// Like `from_snapshot`, but rejects malformed datasets and settings first.
    pub fn from_snapshot_checked(
        snapshot: Snapshot,
        settings: ChartSettings,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        AlignmentService::validate(
            &snapshot.market_caps,
            &snapshot.prices,
            &snapshot.purchases,
        )?;
        Ok(Self::from_snapshot(snapshot, settings))
    }

    /// Load and validate a snapshot directory (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_dir(
        dir: impl AsRef<std::path::Path>,
        settings: ChartSettings,
    ) -> Result<Self, CoreError> {
        let snapshot = SnapshotStore::load_from_dir(dir)?;
        Self::from_snapshot_checked(snapshot, settings)
    }

    /// Load from in-memory JSON documents. A `None` ledger uses the bundled one.
    pub fn load_from_bytes(
        market_caps: &[u8],
        prices: &[u8],
        purchases: Option<&[u8]>,
        settings: ChartSettings,
    ) -> Result<Self, CoreError> {
        let snapshot = SnapshotStore::load_from_bytes(market_caps, prices, purchases)?;
        Self::from_snapshot_checked(snapshot, settings)
    }

    // ── Data access ─────────────────────────────────────────────────

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The aligned series, one point per market-cap observation.
    pub fn aligned_series(&self) -> &[AlignedPoint] {
        self.renderer.series()
    }

    /// Most recent aligned point, if any.
    pub fn latest_point(&self) -> Option<&AlignedPoint> {
        self.aligned_series().last()
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut ChartRenderer {
        &mut self.renderer
    }

    // ── Interaction ─────────────────────────────────────────────────

    /// Show the `[start%, end%]` slice of the full time axis.
    pub fn set_view_window(&mut self, window: ViewWindow) -> RescaleOutcome {
        self.renderer.on_view_window(window)
    }

    pub fn zoom(&mut self, transform: ZoomTransform) -> RescaleOutcome {
        self.renderer.on_zoom(transform)
    }

    pub fn wheel(&mut self, delta_y: f64, cursor_x: f64) -> RescaleOutcome {
        self.renderer.on_wheel(delta_y, cursor_x)
    }

    pub fn drag(&mut self, dx: f64) -> RescaleOutcome {
        self.renderer.on_drag(dx)
    }

    /// Back to the full-range view.
    pub fn reset_view(&mut self) {
        self.renderer.reset();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> &TooltipState {
        self.renderer.on_pointer_move(x, y)
    }

    pub fn pointer_leave(&mut self) {
        self.renderer.on_pointer_leave();
    }

    // ── Output ──────────────────────────────────────────────────────

    /// Standalone SVG document of the current view.
    pub fn render_svg(&self) -> String {
        self.renderer.render_svg()
    }
}
