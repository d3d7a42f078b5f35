use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::purchase::PurchaseEvent;

/// Snapshot file holding the equity market-cap series.
pub const MARKET_CAP_FILE: &str = "market_cap.json";

/// Snapshot file holding the BTC daily closes.
pub const PRICES_FILE: &str = "btc_prices.json";

/// Snapshot file holding the BTC purchase ledger.
pub const PURCHASES_FILE: &str = "btc_purchases.json";

/// Purchase ledger shipped with the crate (newest first), used when a
/// snapshot directory carries no ledger of its own.
const BUNDLED_LEDGER: &str = include_str!("../../data/btc_purchases.json");

/// Serialize one dataset to pretty-printed JSON (two-space indent).
pub fn to_json_bytes<T: Serialize>(records: &[T]) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(records)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize dataset: {e}")))
}

/// Parse one dataset from JSON bytes.
pub fn from_json_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>, CoreError> {
    serde_json::from_slice(data)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse dataset: {e}")))
}

/// The bundled reference ledger.
pub fn default_ledger() -> Result<Vec<PurchaseEvent>, CoreError> {
    from_json_bytes(BUNDLED_LEDGER.as_bytes())
}
