use crate::models::series::SeriesKind;
use crate::models::settings::FetchSettings;

use super::cryptocompare::CryptoCompareProvider;
use super::traits::HistoryProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available history providers.
///
/// Routes requests to providers by `SeriesKind`, in registration order.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn HistoryProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers, configured from
    /// `settings` (API keys, quote currency).
    pub fn new_with_defaults(settings: &FetchSettings) -> Self {
        let mut registry = Self::new();

        // CryptoCompare: crypto closes, API key optional
        registry.register(Box::new(CryptoCompareProvider::from_settings(settings)));

        // Yahoo Finance: equity closes, no API key.
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        registry
    }

    /// Register a new history provider.
    pub fn register(&mut self, provider: Box<dyn HistoryProvider>) {
        self.providers.push(provider);
    }

    /// First provider that supports `kind`.
    pub fn get_provider_for(&self, kind: SeriesKind) -> Option<&dyn HistoryProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_series().contains(&kind))
            .map(|p| p.as_ref())
    }

    /// All providers supporting `kind`, in registration order (fallback chain).
    pub fn get_providers_for(&self, kind: SeriesKind) -> Vec<&dyn HistoryProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_series().contains(&kind))
            .map(|p| p.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
