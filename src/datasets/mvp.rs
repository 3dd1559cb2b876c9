// src/datasets/mvp.rs

use tracing::info;

use super::{RunSummary, SeasonRunner};
use crate::fetch::PageSource;
use crate::table::Season;

pub const MVP_TABLE_ID: &str = "mvp";
pub const MVP_STEM: &str = "mvp_voting";

pub fn mvp_path(season: Season) -> String {
    format!("awards/awards_{}.html", season.end_year)
}

impl<'a, S: PageSource> SeasonRunner<'a, S> {
    pub async fn scrape_mvp_voting(&self, season: Season, summary: &mut RunSummary) {
        info!("[MVP Voting] Season {}", season);
        let built = match self.fetch_page(&mvp_path(season)).await {
            Ok((url, html)) => self.pipeline.build_table(&html, MVP_TABLE_ID, Some(&url), season),
            Err(e) => Err(e),
        };
        match built {
            Ok(table) => self.persist(&table, season, MVP_STEM, summary),
            Err(e) => self.skip(MVP_STEM, &e, summary),
        }
    }
}
