use anyhow::Result;
use clap::Parser;
use hoopscraper::{
    config::{season_range, OutputFormat, ScrapeConfig},
    datasets::{DatasetKind, SeasonRunner},
    fetch::HttpSource,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hoopscraper")]
#[command(about = "Basketball Reference season scraper (player stats, standings, MVP voting)", long_about = None)]
struct Cli {
    /// First season end year (e.g. 2009)
    #[arg(long, default_value_t = 2009)]
    start_year: u16,

    /// Last season end year (e.g. 2024)
    #[arg(long, default_value_t = 2024)]
    end_year: u16,

    /// YAML config file
    #[arg(short, long, env = "HOOPSCRAPER_CONFIG")]
    config: Option<PathBuf>,

    /// Output root, overrides the config file
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format, overrides the config file
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Restrict to these dataset families (repeatable)
    #[arg(long, value_enum)]
    only: Vec<DatasetKind>,

    /// Enable debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let default_filter = if cli.verbose {
        "info,hoopscraper=debug"
    } else {
        "info,hoopscraper=info"
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) configuration ────────────────────────────────────────────
    let mut cfg = match &cli.config {
        Some(path) => ScrapeConfig::load(path)?,
        None => ScrapeConfig::default(),
    };
    if let Some(dir) = cli.out_dir {
        cfg.out_dir = dir;
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    let years = season_range(cli.start_year, cli.end_year)?;
    let kinds = if cli.only.is_empty() {
        DatasetKind::ALL.to_vec()
    } else {
        cli.only
    };
    info!(out_dir = %cfg.out_dir.display(), format = ?cfg.format, ?kinds, "configured");

    // ─── 3) scrape, one season at a time ─────────────────────────────
    let source = HttpSource::new(&cfg)?;
    let runner = SeasonRunner::new(&source, &cfg)?;
    runner.run_seasons(years, &kinds).await;

    Ok(())
}
