// src/datasets/players.rs

use tracing::info;

use super::{RunSummary, SeasonRunner};
use crate::fetch::PageSource;
use crate::table::Season;

/// One player-stats page and the table it carries.
#[derive(Debug, Clone, Copy)]
pub struct PlayerEndpoint {
    pub label: &'static str,
    pub table_id: &'static str,
}

pub const PLAYER_ENDPOINTS: [PlayerEndpoint; 4] = [
    PlayerEndpoint {
        label: "totals",
        table_id: "totals_stats",
    },
    PlayerEndpoint {
        label: "per_game",
        table_id: "per_game_stats",
    },
    PlayerEndpoint {
        label: "per_poss",
        table_id: "per_poss_stats",
    },
    PlayerEndpoint {
        label: "advanced",
        table_id: "advanced_stats",
    },
];

impl PlayerEndpoint {
    pub fn path(&self, season: Season) -> String {
        format!("leagues/NBA_{}_{}.html", season.end_year, self.label)
    }

    pub fn stem(&self) -> String {
        format!("players_{}", self.label)
    }
}

impl<'a, S: PageSource> SeasonRunner<'a, S> {
    /// Totals, per-game, per-possession and advanced tables, one page each.
    pub async fn scrape_player_stats(&self, season: Season, summary: &mut RunSummary) {
        info!("[Players] Season {}", season);
        for ep in PLAYER_ENDPOINTS {
            let stem = ep.stem();
            info!(dataset = %stem, "downloading");
            let built = match self.fetch_page(&ep.path(season)).await {
                Ok((url, html)) => self.pipeline.build_table(&html, ep.table_id, Some(&url), season),
                Err(e) => Err(e),
            };
            match built {
                Ok(table) => self.persist(&table, season, &stem, summary),
                Err(e) => self.skip(&stem, &e, summary),
            }
        }
    }
}
