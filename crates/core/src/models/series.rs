use serde::{Deserialize, Serialize};

/// Kind of daily history a provider can supply.
/// Determines which history provider is used during a snapshot fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Crypto spot closes (BTC/USD), served by CryptoCompare
    Crypto,
    /// Equity closes (MSTR), served by Yahoo Finance
    Equity,
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesKind::Crypto => write!(f, "Crypto"),
            SeriesKind::Equity => write!(f, "Equity"),
        }
    }
}
