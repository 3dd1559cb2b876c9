// src/datasets/standings.rs

use tracing::{info, warn};

use super::{RunSummary, SeasonRunner};
use crate::fetch::PageSource;
use crate::table::{tag_season, NormalizedTable, Season};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const BOTH: [Conference; 2] = [Conference::East, Conference::West];

    pub fn table_id(self) -> &'static str {
        match self {
            Conference::East => "confs_standings_E",
            Conference::West => "confs_standings_W",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }

    pub fn stem(self) -> &'static str {
        match self {
            Conference::East => "standings_east",
            Conference::West => "standings_west",
        }
    }
}

pub const CONFERENCE_COLUMN: &str = "Conference";
pub const COMBINED_STEM: &str = "standings";

pub fn standings_path(season: Season) -> String {
    format!("leagues/NBA_{}_standings.html", season.end_year)
}

/// Name the team column, add `Conference`, then tag the season.
///
/// The first column is headed by the conference name on the source page; it
/// becomes `Team` only when it really is such a heading.
pub fn normalize_conference(
    mut table: NormalizedTable,
    conference: Conference,
    season: Season,
) -> NormalizedTable {
    if let Some(first) = table.columns().first().cloned() {
        let lower = first.to_lowercase();
        if lower.starts_with("eastern conference") || lower.starts_with("western conference") {
            table.rename_column(&first, "Team");
        }
    }
    table.push_constant_column(CONFERENCE_COLUMN, conference.label());
    tag_season(&mut table, season);
    table
}

/// Stack whichever conferences are present, east first.
pub fn combine(east: Option<NormalizedTable>, west: Option<NormalizedTable>) -> Option<NormalizedTable> {
    NormalizedTable::concat(east.into_iter().chain(west))
}

impl<'a, S: PageSource> SeasonRunner<'a, S> {
    /// Both conference tables come from the same page, fetched once.
    pub async fn scrape_standings(&self, season: Season, summary: &mut RunSummary) {
        info!("[Standings] Season {}", season);
        let (url, html) = match self.fetch_page(&standings_path(season)).await {
            Ok(page) => page,
            Err(e) => {
                for stem in [Conference::East.stem(), Conference::West.stem(), COMBINED_STEM] {
                    self.skip(stem, &e, summary);
                }
                return;
            }
        };

        let mut sides = [None, None];
        for (slot, conf) in sides.iter_mut().zip(Conference::BOTH) {
            match self.pipeline.extract_table(&html, conf.table_id(), Some(&url)) {
                Ok(t) => *slot = Some(normalize_conference(t, conf, season)),
                Err(e) => self.skip(conf.stem(), &e, summary),
            }
        }
        let [east, west] = sides;

        if east.is_none() && west.is_none() {
            warn!(dataset = COMBINED_STEM, "no data");
            summary.skipped += 1;
            return;
        }

        for (side, conf) in [&east, &west].into_iter().zip(Conference::BOTH) {
            if let Some(t) = side {
                self.persist(t, season, conf.stem(), summary);
            }
        }
        if let Some(all) = combine(east, west) {
            self.persist(&all, season, COMBINED_STEM, summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf_table(heading: &str, teams: &[&str]) -> NormalizedTable {
        NormalizedTable::from_rows(
            vec![heading.to_string(), "W".to_string()],
            teams.iter().map(|t| vec![t.to_string(), "41".to_string()]).collect(),
        )
    }

    #[test]
    fn conference_heading_becomes_team() {
        let t = normalize_conference(
            conf_table("Eastern Conference", &["Boston Celtics*"]),
            Conference::East,
            Season::new(2010),
        );
        assert_eq!(t.columns(), ["Team", "W", "Conference", "season_end_year", "season"]);
        assert_eq!(t.get(0, "Team"), Some("Boston Celtics*"));
        assert_eq!(t.get(0, "Conference"), Some("East"));
    }

    #[test]
    fn heading_match_is_case_insensitive() {
        let t = normalize_conference(
            conf_table("WESTERN CONFERENCE", &["Denver Nuggets*"]),
            Conference::West,
            Season::new(2023),
        );
        assert_eq!(t.columns()[0], "Team");
    }

    #[test]
    fn other_first_column_is_left_alone() {
        let t = normalize_conference(conf_table("Rk", &["1"]), Conference::West, Season::new(2023));
        assert_eq!(t.columns()[0], "Rk");
    }

    #[test]
    fn combined_has_both_conferences() {
        let season = Season::new(2010);
        let east = normalize_conference(
            conf_table("Eastern Conference", &["A", "B", "C"]),
            Conference::East,
            season,
        );
        let west = normalize_conference(
            conf_table("Western Conference", &["D", "E", "F", "G"]),
            Conference::West,
            season,
        );
        let all = combine(Some(east), Some(west)).unwrap();
        assert_eq!(all.len(), 7);
        let confs = all.column_values("Conference");
        assert!(confs.contains(&"East") && confs.contains(&"West"));
        assert_eq!(&confs[..3], ["East", "East", "East"]);
    }

    #[test]
    fn combined_with_one_side_is_that_side() {
        let east = normalize_conference(
            conf_table("Eastern Conference", &["A", "B", "C"]),
            Conference::East,
            Season::new(2010),
        );
        assert_eq!(combine(Some(east.clone()), None), Some(east));
        assert_eq!(combine(None, None), None);
    }
}
