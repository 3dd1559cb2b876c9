// src/datasets/mod.rs

//! Per-season dataset runners. Every dataset is fetched, parsed and written
//! to completion before the next one starts; a failure in one never stops
//! the others.

pub mod mvp;
pub mod players;
pub mod standings;

use anyhow::{Context, Result};
use std::{ops::RangeInclusive, time::Duration};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{DatasetError, FetchError};
use crate::fetch::{fetch_html, PageSource};
use crate::table::{NormalizedTable, Season, TablePipeline};
use crate::write::TableWriter;

/// Dataset families selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetKind {
    Players,
    Standings,
    Mvp,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [DatasetKind::Players, DatasetKind::Standings, DatasetKind::Mvp];
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
}

pub struct SeasonRunner<'a, S> {
    source: &'a S,
    base_url: Url,
    pause: Duration,
    pipeline: TablePipeline<'a>,
    writer: TableWriter,
}

impl<'a, S: PageSource> SeasonRunner<'a, S> {
    pub fn new(source: &'a S, cfg: &'a ScrapeConfig) -> Result<Self> {
        let mut base = cfg.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).with_context(|| format!("parsing base_url {}", cfg.base_url))?;
        Ok(Self {
            source,
            base_url,
            pause: cfg.pause(),
            pipeline: TablePipeline::new(&cfg.signatures),
            writer: TableWriter::new(cfg.out_dir.clone(), cfg.format),
        })
    }

    fn page_url(&self, path: &str) -> Result<Url, DatasetError> {
        self.base_url
            .join(path)
            .map_err(|e| DatasetError::Fetch(FetchError::Other(format!("bad url {path}: {e}"))))
    }

    async fn fetch_page(&self, path: &str) -> Result<(Url, String), DatasetError> {
        let url = self.page_url(path)?;
        let html = fetch_html(self.source, &url, self.pause).await?;
        Ok((url, html))
    }

    /// Write one table and log the outcome. Write errors count as a skip.
    fn persist(&self, table: &NormalizedTable, season: Season, stem: &str, summary: &mut RunSummary) {
        match self.writer.write(table, season, stem) {
            Ok(path) => {
                info!(dataset = stem, path = %path.display(), rows = table.len(), "saved");
                summary.written += 1;
            }
            Err(e) => {
                let err = DatasetError::Write(e);
                error!(dataset = stem, error = %err, "skipped");
                summary.skipped += 1;
            }
        }
    }

    /// Log why a dataset produced nothing.
    fn skip(&self, stem: &str, err: &DatasetError, summary: &mut RunSummary) {
        match err {
            DatasetError::Fetch(_) => warn!(dataset = stem, "skipped (no HTML)"),
            _ => warn!(dataset = stem, reason = %err, "no data"),
        }
        summary.skipped += 1;
    }

    #[instrument(level = "info", skip_all, fields(season = %season))]
    pub async fn run_season(&self, season: Season, kinds: &[DatasetKind], summary: &mut RunSummary) {
        for kind in DatasetKind::ALL {
            if !kinds.contains(&kind) {
                continue;
            }
            match kind {
                DatasetKind::Players => self.scrape_player_stats(season, summary).await,
                DatasetKind::Standings => self.scrape_standings(season, summary).await,
                DatasetKind::Mvp => self.scrape_mvp_voting(season, summary).await,
            }
        }
    }

    pub async fn run_seasons(&self, years: RangeInclusive<u16>, kinds: &[DatasetKind]) -> RunSummary {
        info!("Starting scrape for seasons {}..{}", years.start(), years.end());
        let mut summary = RunSummary::default();
        for year in years {
            self.run_season(Season::new(year), kinds, &mut summary).await;
        }
        info!(written = summary.written, skipped = summary.skipped, "All done");
        summary
    }
}
