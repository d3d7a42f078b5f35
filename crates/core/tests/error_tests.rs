// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use treasury_chart_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("buffer overflow".into());
        assert_eq!(err.to_string(), "Serialization error: buffer overflow");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "CryptoCompare".into(),
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error (CryptoCompare): rate limited");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("Equity".into());
        assert_eq!(err.to_string(), "No provider available for series: Equity");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("duplicate date".into());
        assert_eq!(err.to_string(), "Validation failed: duplicate date");
    }

    #[test]
    fn price_not_available() {
        let err = CoreError::PriceNotAvailable {
            symbol: "BTC".into(),
            date: "2020-08-11".into(),
        };
        assert_eq!(err.to_string(), "Price not available for BTC on 2020-08-11");
    }

    #[test]
    fn insufficient_history() {
        let err = CoreError::InsufficientHistory {
            symbol: "BTC".into(),
            earliest: "2021-01-01".into(),
            required: "2020-08-11".into(),
        };
        assert_eq!(
            err.to_string(),
            "BTC history starts at 2021-01-01, but data is required from 2020-08-11"
        );
    }
}

// ── Debug trait ─────────────────────────────────────────────────────

mod debug_trait {
    use super::*;

    #[test]
    fn all_variants_are_debug() {
        let variants: Vec<CoreError> = vec![
            CoreError::Serialization("test".into()),
            CoreError::Deserialization("test".into()),
            CoreError::FileIO("test".into()),
            CoreError::Api {
                provider: "p".into(),
                message: "m".into(),
            },
            CoreError::Network("test".into()),
            CoreError::NoProvider("test".into()),
            CoreError::ValidationError("test".into()),
            CoreError::PriceNotAvailable {
                symbol: "X".into(),
                date: "Z".into(),
            },
            CoreError::InsufficientHistory {
                symbol: "X".into(),
                earliest: "Y".into(),
                required: "Z".into(),
            },
        ];

        for variant in &variants {
            assert!(!format!("{variant:?}").is_empty());
        }
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::FileIO(msg) => assert!(msg.contains("file not found")),
            other => panic!("Expected FileIO, got {other:?}"),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1, 2,").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_converts_io_error() {
        fn read_missing() -> Result<Vec<u8>, CoreError> {
            Ok(std::fs::read("/definitely/not/here/market_cap.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}

// ── std::error::Error ───────────────────────────────────────────────

mod std_error {
    use super::*;

    #[test]
    fn boxes_into_dyn_error() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::Network("down".into()));
        assert_eq!(err.to_string(), "Network error: down");
    }
}
