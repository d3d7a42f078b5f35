// ═══════════════════════════════════════════════════════════════════
// Integration Tests — TreasuryChart facade end to end
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use tempfile::TempDir;

use treasury_chart_core::chart::viewport::RescaleOutcome;
use treasury_chart_core::chart::zoom::ViewWindow;
use treasury_chart_core::errors::CoreError;
use treasury_chart_core::models::market_cap::MarketCapObservation;
use treasury_chart_core::models::price::PriceObservation;
use treasury_chart_core::models::purchase::PurchaseEvent;
use treasury_chart_core::models::settings::{ChartSettings, MissingPricePolicy};
use treasury_chart_core::models::snapshot::Snapshot;
use treasury_chart_core::storage::format::to_json_bytes;
use treasury_chart_core::storage::manager::SnapshotStore;
use treasury_chart_core::TreasuryChart;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn two_day_snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            MarketCapObservation::new(d(2021, 1, 1), 1000.0),
            MarketCapObservation::new(d(2021, 1, 2), 1100.0),
        ],
        vec![
            PriceObservation::new(d(2021, 1, 1), 10.0),
            PriceObservation::new(d(2021, 1, 2), 12.0),
        ],
        vec![PurchaseEvent::units(d(2021, 1, 1), 50.0)],
    )
}

/// A month of trading days with a purchase mid-way and one missing price.
fn month_snapshot() -> Snapshot {
    let days: Vec<NaiveDate> = (1..=31).map(|day| d(2021, 1, day)).collect();
    let caps = days
        .iter()
        .enumerate()
        .map(|(i, date)| MarketCapObservation::new(*date, 1e9 + i as f64 * 1e7))
        .collect();
    let prices = days
        .iter()
        .filter(|date| **date != d(2021, 1, 20))
        .map(|date| PriceObservation::new(*date, 30_000.0))
        .collect();
    let purchases = vec![
        PurchaseEvent::units(d(2021, 1, 1), 10_000.0),
        PurchaseEvent::units(d(2021, 1, 15), 10_000.0),
    ];
    Snapshot::new(caps, prices, purchases)
}

// ── Facade ──────────────────────────────────────────────────────────

mod facade {
    use super::*;

    #[test]
    fn aligned_series_matches_worked_example() {
        let chart = TreasuryChart::from_snapshot(two_day_snapshot(), ChartSettings::default());
        let series = chart.aligned_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].holdings_value, 500.0);
        assert!((series[0].ratio - 100.0).abs() < 1e-9);
        assert_eq!(series[1].holdings_value, 600.0);
        assert!((series[1].ratio - 83.333_333_333).abs() < 1e-6);

        let latest = chart.latest_point().unwrap();
        assert_eq!(latest.date, d(2021, 1, 2));
        assert_eq!(chart.snapshot(), &two_day_snapshot());
    }

    #[test]
    fn missing_price_policy_comes_from_settings() {
        let zero = TreasuryChart::from_snapshot(month_snapshot(), ChartSettings::default());
        let jan20 = |c: &TreasuryChart| {
            *c.aligned_series()
                .iter()
                .find(|p| p.date == d(2021, 1, 20))
                .unwrap()
        };
        assert_eq!(jan20(&zero).holdings_value, 0.0);

        let settings = ChartSettings {
            missing_price: MissingPricePolicy::CarryForward,
            ..ChartSettings::default()
        };
        let carry = TreasuryChart::from_snapshot(month_snapshot(), settings);
        assert_eq!(jan20(&carry).holdings_value, 20_000.0 * 30_000.0);
    }

    #[test]
    fn checked_constructor_rejects_bad_input() {
        let mut snapshot = two_day_snapshot();
        snapshot.market_caps.reverse();
        let err = TreasuryChart::from_snapshot_checked(snapshot, ChartSettings::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn checked_constructor_rejects_inverted_zoom_extent() {
        let settings = ChartSettings {
            min_zoom: 10.0,
            max_zoom: 5.0,
            ..ChartSettings::default()
        };
        let err = TreasuryChart::from_snapshot_checked(two_day_snapshot(), settings).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("inverted")));
    }

    #[test]
    fn empty_snapshot_still_renders() {
        let mut chart = TreasuryChart::from_snapshot(Snapshot::default(), ChartSettings::default());
        assert!(chart.latest_point().is_none());
        assert_eq!(chart.set_view_window(ViewWindow::new(0.0, 50.0)), RescaleOutcome::Unchanged);
        assert!(!chart.pointer_move(100.0, 100.0).visible);
        assert!(chart.render_svg().contains("</svg>"));
    }

    #[test]
    fn debug_shows_sizes_only() {
        let chart = TreasuryChart::from_snapshot(two_day_snapshot(), ChartSettings::default());
        let dbg = format!("{chart:?}");
        assert!(dbg.contains("market_caps: 2"));
        assert!(dbg.contains("purchases: 1"));
    }
}

// ── Interaction session ─────────────────────────────────────────────

mod session {
    use super::*;

    #[test]
    fn zoom_hover_and_reset() {
        let mut chart = TreasuryChart::from_snapshot(month_snapshot(), ChartSettings::default());
        let series_before = chart.aligned_series().to_vec();
        let initial = chart.renderer().initial_domains();

        // Zoom into the second half
        let outcome = chart.set_view_window(ViewWindow::new(50.0, 100.0));
        assert!(matches!(outcome, RescaleOutcome::Applied(ref r) if r.start == 15 && r.end == 31));
        let zoomed = chart.renderer().current_domains();
        assert!(zoomed.time.min > initial.time.min);
        assert!(zoomed.value.max <= initial.value.max * 1.1);

        // Hover at the left edge of the zoomed plot lands on the window start
        let tip = chart.pointer_move(0.0, 50.0).clone();
        assert!(tip.visible);
        let hovered = chart.aligned_series()[tip.index.unwrap()];
        assert!(hovered.date >= d(2021, 1, 16) && hovered.date <= d(2021, 1, 17));

        // Wheel, drag, then an empty window: domains survive the no-op
        chart.wheel(-200.0, 480.0);
        chart.drag(-100.0);
        let before = chart.renderer().current_domains();
        assert_eq!(chart.set_view_window(ViewWindow::new(30.0, 30.0)), RescaleOutcome::Unchanged);
        let after = chart.renderer().current_domains();
        assert_eq!(before.value, after.value);
        assert_eq!(before.ratio, after.ratio);

        chart.pointer_leave();
        assert!(!chart.renderer().tooltip().visible);

        chart.reset_view();
        assert_eq!(chart.renderer().current_domains(), initial);
        assert_eq!(chart.aligned_series(), series_before.as_slice());
    }

    #[test]
    fn renderer_mut_exposes_raw_events() {
        let mut chart = TreasuryChart::from_snapshot(month_snapshot(), ChartSettings::default());
        chart.renderer_mut().on_view_window(ViewWindow::new(0.0, 25.0));
        assert_eq!(chart.renderer().window(), ViewWindow::new(0.0, 25.0));
    }
}

// ── Loading ─────────────────────────────────────────────────────────

mod loading {
    use super::*;

    #[test]
    fn load_from_dir_renders_svg() {
        let dir = TempDir::new().unwrap();
        SnapshotStore::save_to_dir(&month_snapshot(), dir.path()).unwrap();

        let chart = TreasuryChart::load_from_dir(dir.path(), ChartSettings::default()).unwrap();
        assert_eq!(chart.aligned_series().len(), 31);
        let svg = chart.render_svg();
        assert!(svg.contains("MSTR Market Cap"));
        assert!(svg.contains("BTC Holdings Value"));
    }

    #[test]
    fn load_from_dir_validates() {
        let dir = TempDir::new().unwrap();
        let mut snapshot = month_snapshot();
        snapshot.prices.push(PriceObservation::new(d(2021, 1, 1), 1.0));
        SnapshotStore::save_to_dir(&snapshot, dir.path()).unwrap();

        let err = TreasuryChart::load_from_dir(dir.path(), ChartSettings::default()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn load_from_bytes_with_bundled_ledger() {
        let s = month_snapshot();
        let chart = TreasuryChart::load_from_bytes(
            &to_json_bytes(&s.market_caps).unwrap(),
            &to_json_bytes(&s.prices).unwrap(),
            None,
            ChartSettings::default(),
        )
        .unwrap();
        // Bundled ledger holds 70_470 BTC by January 2021
        assert!(chart.aligned_series()[0].holdings_value > 0.0);
        assert_eq!(chart.snapshot().purchases.len(), 38);
    }
}
