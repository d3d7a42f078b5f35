use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use treasury_chart_core::models::settings::{ChartSettings, FetchSettings};

pub struct Config {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub settings_path: Option<PathBuf>,
    pub start_date: Option<NaiveDate>,
    pub cryptocompare_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = std::env::var("TC_DATA_DIR").unwrap_or_else(|_| "./data".into());
        let output = std::env::var("TC_OUTPUT").unwrap_or_else(|_| "chart.svg".into());
        let settings_path = std::env::var("TC_SETTINGS").ok().map(PathBuf::from);
        let start_date = match std::env::var("TC_START_DATE") {
            Ok(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .with_context(|| format!("Invalid TC_START_DATE: {raw}"))?,
            ),
            Err(_) => None,
        };
        let cryptocompare_api_key = std::env::var("CRYPTOCOMPARE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            output: PathBuf::from(output),
            settings_path,
            start_date,
            cryptocompare_api_key,
        })
    }

    /// Chart settings from `TC_SETTINGS`, defaults otherwise.
    pub fn chart_settings(&self) -> anyhow::Result<ChartSettings> {
        let Some(path) = &self.settings_path else {
            return Ok(ChartSettings::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: ChartSettings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(start) = self.start_date {
            settings.start_date = start;
        }
        if let Some(key) = &self.cryptocompare_api_key {
            settings
                .api_keys
                .insert("cryptocompare".to_string(), key.clone());
        }
        settings
    }
}
