use std::path::Path;

use crate::errors::CoreError;
use crate::models::market_cap::MarketCapObservation;
use crate::models::price::PriceObservation;
use crate::models::purchase::PurchaseEvent;
use crate::models::snapshot::Snapshot;

use super::format::{self, MARKET_CAP_FILE, PRICES_FILE, PURCHASES_FILE};

/// High-level storage operations: save/load a snapshot to/from a directory
/// of three JSON files.
pub struct SnapshotStore;

impl SnapshotStore {
    /// Write all three datasets into `dir`, creating it if needed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_dir(snapshot: &Snapshot, dir: impl AsRef<Path>) -> Result<(), CoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        std::fs::write(dir.join(MARKET_CAP_FILE), format::to_json_bytes(&snapshot.market_caps)?)?;
        std::fs::write(dir.join(PRICES_FILE), format::to_json_bytes(&snapshot.prices)?)?;
        std::fs::write(dir.join(PURCHASES_FILE), format::to_json_bytes(&snapshot.purchases)?)?;

        log::info!(
            "Saved snapshot to {}: {} market caps, {} prices, {} purchases",
            dir.display(),
            snapshot.market_caps.len(),
            snapshot.prices.len(),
            snapshot.purchases.len()
        );
        Ok(())
    }

    /// Load a snapshot from `dir`.
    ///
    /// The market-cap and price files are required. A missing purchase file
    /// falls back to the bundled ledger.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Snapshot, CoreError> {
        let dir = dir.as_ref();

        let market_caps: Vec<MarketCapObservation> =
            Self::read_dataset(&dir.join(MARKET_CAP_FILE))?;
        let prices: Vec<PriceObservation> = Self::read_dataset(&dir.join(PRICES_FILE))?;

        let purchases_path = dir.join(PURCHASES_FILE);
        let purchases: Vec<PurchaseEvent> = if purchases_path.exists() {
            Self::read_dataset(&purchases_path)?
        } else {
            log::info!(
                "No {PURCHASES_FILE} in {}; using bundled purchase ledger",
                dir.display()
            );
            format::default_ledger()?
        };

        log::debug!(
            "Loaded snapshot from {}: {} market caps, {} prices, {} purchases",
            dir.display(),
            market_caps.len(),
            prices.len(),
            purchases.len()
        );
        Ok(Snapshot::new(market_caps, prices, purchases))
    }

    /// Build a snapshot from in-memory JSON documents (WASM hosts fetch the
    /// files themselves).
    pub fn load_from_bytes(
        market_caps: &[u8],
        prices: &[u8],
        purchases: Option<&[u8]>,
    ) -> Result<Snapshot, CoreError> {
        let purchases = match purchases {
            Some(bytes) => format::from_json_bytes(bytes)?,
            None => format::default_ledger()?,
        };
        Ok(Snapshot::new(
            format::from_json_bytes(market_caps)?,
            format::from_json_bytes(prices)?,
            purchases,
        ))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_dataset<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoreError::FileIO(format!("{}: {e}", path.display())))?;
        format::from_json_bytes(&bytes).map_err(|e| match e {
            CoreError::Deserialization(msg) => {
                CoreError::Deserialization(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}
