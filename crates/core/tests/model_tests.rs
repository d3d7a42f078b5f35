// ═══════════════════════════════════════════════════════════════════
// Model Tests — datasets, AlignedPoint, PriceLookup, settings, serde
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use treasury_chart_core::errors::CoreError;
use treasury_chart_core::models::chart::{premium_ratio, AlignedPoint};
use treasury_chart_core::models::market_cap::MarketCapObservation;
use treasury_chart_core::models::price::{PriceLookup, PriceObservation};
use treasury_chart_core::models::purchase::PurchaseEvent;
use treasury_chart_core::models::series::SeriesKind;
use treasury_chart_core::models::settings::{ChartSettings, FetchSettings, MissingPricePolicy};
use treasury_chart_core::models::snapshot::Snapshot;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Premium ratio ───────────────────────────────────────────────────

mod ratio {
    use super::*;

    #[test]
    fn premium_is_positive() {
        assert!(approx(premium_ratio(150.0, 100.0), 50.0));
    }

    #[test]
    fn discount_is_negative() {
        assert!(approx(premium_ratio(50.0, 100.0), -50.0));
    }

    #[test]
    fn parity_is_zero() {
        assert_eq!(premium_ratio(100.0, 100.0), 0.0);
    }

    #[test]
    fn zero_holdings_gives_zero_ratio() {
        assert_eq!(premium_ratio(1_000.0, 0.0), 0.0);
        assert_eq!(premium_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn aligned_point_derives_ratio() {
        let p = AlignedPoint::new(d(2021, 1, 1), 1100.0, 600.0);
        assert!(approx(p.ratio, 500.0 / 6.0));
        assert_eq!(p.max_value(), 1100.0);
        assert_eq!(p.min_value(), 600.0);
    }

    #[test]
    fn aligned_point_without_holdings_is_finite() {
        let p = AlignedPoint::new(d(2020, 1, 1), 1_000_000.0, 0.0);
        assert_eq!(p.ratio, 0.0);
        assert!(p.ratio.is_finite());
    }
}

// ── PriceLookup ─────────────────────────────────────────────────────

mod price_lookup {
    use super::*;

    fn lookup() -> PriceLookup {
        PriceLookup::new(&[
            PriceObservation::new(d(2021, 1, 5), 50.0),
            PriceObservation::new(d(2021, 1, 1), 10.0),
            PriceObservation::new(d(2021, 1, 3), 30.0),
        ])
    }

    #[test]
    fn exact_lookup() {
        let l = lookup();
        assert_eq!(l.get(d(2021, 1, 3)), Some(30.0));
        assert_eq!(l.get(d(2021, 1, 2)), None);
        assert_eq!(l.len(), 3);
        assert!(!l.is_empty());
    }

    #[test]
    fn latest_on_or_before_uses_sorted_order() {
        let l = lookup();
        assert_eq!(l.latest_on_or_before(d(2021, 1, 2)), Some(10.0));
        assert_eq!(l.latest_on_or_before(d(2021, 1, 3)), Some(30.0));
        assert_eq!(l.latest_on_or_before(d(2021, 2, 1)), Some(50.0));
    }

    #[test]
    fn nothing_before_first_observation() {
        assert_eq!(lookup().latest_on_or_before(d(2020, 12, 31)), None);
    }

    #[test]
    fn empty_lookup() {
        let l = PriceLookup::new(&[]);
        assert!(l.is_empty());
        assert_eq!(l.get(d(2021, 1, 1)), None);
        assert_eq!(l.latest_on_or_before(d(2021, 1, 1)), None);
    }
}

// ── Serde formats ───────────────────────────────────────────────────

mod serde_format {
    use super::*;

    #[test]
    fn market_cap_uses_camel_case() {
        let json = serde_json::to_string(&MarketCapObservation::new(d(2024, 1, 2), 1.5e10)).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-02","marketCap":15000000000.0}"#);
    }

    #[test]
    fn purchase_parses_snapshot_layout() {
        let json = r#"{"date":"2020-08-11","amount":21454,"averagePrice":11653,"cost":250000000}"#;
        let p: PurchaseEvent = serde_json::from_str(json).unwrap();
        assert_eq!(p.date, d(2020, 8, 11));
        assert_eq!(p.amount, 21454.0);
        assert_eq!(p.average_price, 11653.0);
        assert_eq!(p.cost, 250_000_000.0);
    }

    #[test]
    fn price_observation_round_trips() {
        let p = PriceObservation::new(d(2023, 3, 4), 22_345.67);
        let back: PriceObservation =
            serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn aligned_point_uses_camel_case() {
        let json = serde_json::to_value(AlignedPoint::new(d(2021, 1, 1), 2.0, 1.0)).unwrap();
        assert_eq!(json["holdingsValue"], 1.0);
        assert_eq!(json["marketCap"], 2.0);
        assert_eq!(json["ratio"], 100.0);
    }

    #[test]
    fn bad_date_is_rejected() {
        let json = r#"{"date":"2024-13-01","price":1.0}"#;
        assert!(serde_json::from_str::<PriceObservation>(json).is_err());
    }

    #[test]
    fn series_kind_display() {
        assert_eq!(SeriesKind::Crypto.to_string(), "Crypto");
        assert_eq!(SeriesKind::Equity.to_string(), "Equity");
    }
}

// ── Settings ────────────────────────────────────────────────────────

mod settings {
    use super::*;

    #[test]
    fn chart_defaults() {
        let s = ChartSettings::default();
        assert_eq!(s.padding_fraction, 0.05);
        assert_eq!((s.min_zoom, s.max_zoom), (1.0, 500.0));
        assert_eq!(s.tooltip_offset, (15.0, -15.0));
        assert_eq!(s.missing_price, MissingPricePolicy::Zero);
        assert_eq!(s.plot_width(), 960.0);
        assert_eq!(s.plot_height(), 500.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let s: ChartSettings =
            serde_json::from_str(r#"{"width": 800, "missing_price": "CarryForward"}"#).unwrap();
        assert_eq!(s.width, 800.0);
        assert_eq!(s.height, 600.0);
        assert_eq!(s.missing_price, MissingPricePolicy::CarryForward);
        assert_eq!(s.equity_label, "MSTR");
    }

    #[test]
    fn plot_size_never_negative() {
        let s = ChartSettings {
            width: 100.0,
            height: 50.0,
            ..ChartSettings::default()
        };
        assert_eq!(s.plot_width(), 0.0);
        assert_eq!(s.plot_height(), 0.0);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(ChartSettings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unusable_zoom_and_padding() {
        let inverted: ChartSettings =
            serde_json::from_str(r#"{"min_zoom": 10.0, "max_zoom": 5.0}"#).unwrap();
        let non_positive = ChartSettings {
            min_zoom: 0.0,
            ..ChartSettings::default()
        };
        let negative_padding = ChartSettings {
            padding_fraction: -0.1,
            ..ChartSettings::default()
        };
        for s in [inverted, non_positive, negative_padding] {
            assert!(
                matches!(s.validate(), Err(CoreError::ValidationError(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn fetch_defaults() {
        let s = FetchSettings::default();
        assert_eq!(s.start_date, d(2020, 8, 11));
        assert_eq!(s.equity_symbol, "MSTR");
        assert_eq!(s.crypto_symbol, "BTC");
        assert_eq!(s.quote_currency, "USD");
        assert_eq!(s.shares_outstanding, 244_000_000.0);
        assert!(s.api_keys.is_empty());
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

mod snapshot {
    use super::*;

    #[test]
    fn default_is_empty() {
        let s = Snapshot::default();
        assert!(s.market_caps.is_empty());
        assert!(s.prices.is_empty());
        assert!(s.purchases.is_empty());
    }

    #[test]
    fn new_keeps_datasets_as_given() {
        let s = Snapshot::new(
            vec![MarketCapObservation::new(d(2021, 1, 1), 1.0)],
            vec![PriceObservation::new(d(2021, 1, 1), 2.0)],
            vec![PurchaseEvent::units(d(2021, 1, 1), 3.0)],
        );
        assert_eq!(s.market_caps[0].market_cap, 1.0);
        assert_eq!(s.prices[0].price, 2.0);
        assert_eq!(s.purchases[0].amount, 3.0);
    }
}
