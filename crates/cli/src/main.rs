mod config;

use anyhow::{bail, Context};
use config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use treasury_chart_core::chart::tooltip::{format_billions, format_percent};
use treasury_chart_core::chart::viewport::RescaleOutcome;
use treasury_chart_core::chart::zoom::ViewWindow;
use treasury_chart_core::providers::registry::ProviderRegistry;
use treasury_chart_core::services::snapshot_service::SnapshotService;
use treasury_chart_core::storage::manager::SnapshotStore;
use treasury_chart_core::TreasuryChart;

const USAGE: &str = "usage: treasury-chart <fetch | render [START% END%]>";

fn init_tracing() {
    let log_format = std::env::var("TC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("fetch") => fetch(&config).await,
        Some("render") => render(&config, &args[1..]),
        Some("-h") | Some("--help") | Some("help") => {
            println!("{USAGE}");
            Ok(())
        }
        _ => bail!("{USAGE}"),
    }
}

async fn fetch(config: &Config) -> anyhow::Result<()> {
    let settings = config.fetch_settings();
    let registry = ProviderRegistry::new_with_defaults(&settings);
    let service = SnapshotService::new(registry, settings);

    let snapshot = service.fetch().await.context("Snapshot fetch failed")?;
    SnapshotStore::save_to_dir(&snapshot, &config.data_dir)?;
    tracing::info!(
        "Snapshot written to {} ({} trading days)",
        config.data_dir.display(),
        snapshot.market_caps.len()
    );
    Ok(())
}

fn render(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let window = parse_window(args)?;
    let mut chart = TreasuryChart::load_from_dir(&config.data_dir, config.chart_settings()?)
        .with_context(|| format!("Failed to load snapshot from {}", config.data_dir.display()))?;

    if let Some(window) = window {
        if chart.set_view_window(window) == RescaleOutcome::Unchanged {
            tracing::warn!(
                "View window {}%..{}% selects no points; showing full range",
                window.start_pct,
                window.end_pct
            );
        }
    }

    std::fs::write(&config.output, chart.render_svg())
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    match chart.latest_point() {
        Some(latest) => tracing::info!(
            "Rendered {} points to {}; latest {}: market cap {}, holdings {}, premium {}",
            chart.aligned_series().len(),
            config.output.display(),
            latest.date,
            format_billions(latest.market_cap),
            format_billions(latest.holdings_value),
            format_percent(latest.ratio)
        ),
        None => tracing::warn!("Snapshot is empty; rendered an empty chart"),
    }
    Ok(())
}

fn parse_window(args: &[String]) -> anyhow::Result<Option<ViewWindow>> {
    match args {
        [] => Ok(None),
        [start, end] => {
            let start: f64 = start
                .trim_end_matches('%')
                .parse()
                .with_context(|| format!("Invalid start percentage: {start}"))?;
            let end: f64 = end
                .trim_end_matches('%')
                .parse()
                .with_context(|| format!("Invalid end percentage: {end}"))?;
            if !(0.0..=100.0).contains(&start) || !(0.0..=100.0).contains(&end) || start > end {
                bail!("View window must satisfy 0 <= START <= END <= 100");
            }
            Ok(Some(ViewWindow::new(start, end)))
        }
        _ => bail!("{USAGE}"),
    }
}
