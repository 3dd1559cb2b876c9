// src/table/pipeline.rs

use tracing::debug;
use url::Url;

use super::{normalize_columns, strip_repeated_headers, Locator, NormalizedTable, Season};
use crate::error::DatasetError;

pub const SEASON_END_YEAR_COLUMN: &str = "season_end_year";
pub const SEASON_COLUMN: &str = "season";

/// Append `season_end_year` and `season` to every row. Both columns are
/// always written together.
pub fn tag_season(table: &mut NormalizedTable, season: Season) {
    table.push_constant_column(SEASON_END_YEAR_COLUMN, &season.end_year.to_string());
    table.push_constant_column(SEASON_COLUMN, &season.label());
}

/// Locate → normalize → sanitize, with season tagging on top.
pub struct TablePipeline<'a> {
    locator: Locator<'a>,
}

impl<'a> TablePipeline<'a> {
    pub fn new(signatures: &'a [Vec<String>]) -> Self {
        Self {
            locator: Locator::new(signatures),
        }
    }

    /// The untagged table, for callers that add their own columns first.
    pub fn extract_table(
        &self,
        html: &str,
        table_id: &str,
        fallback_url: Option<&Url>,
    ) -> Result<NormalizedTable, DatasetError> {
        let located = self
            .locator
            .locate(html, table_id, fallback_url)
            .ok_or_else(|| DatasetError::TableNotFound(table_id.to_string()))?;
        debug!(table_id, strategy = %located.strategy, "normalizing");

        let table = strip_repeated_headers(normalize_columns(located.table));
        if table.is_empty() {
            return Err(DatasetError::EmptyTable(table_id.to_string()));
        }
        Ok(table)
    }

    pub fn build_table(
        &self,
        html: &str,
        table_id: &str,
        fallback_url: Option<&Url>,
        season: Season,
    ) -> Result<NormalizedTable, DatasetError> {
        let mut table = self.extract_table(html, table_id, fallback_url)?;
        tag_season(&mut table, season);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_signatures;

    const TOTALS: &str = r#"<html><body>
      <div id="all_totals_stats">
      <table id="totals_stats">
        <thead><tr><th>Rk</th><th>Player</th><th>Age</th><th class="blank"></th><th>PTS</th></tr></thead>
        <tbody>
          <tr><th>1</th><td><a href="/a">Player A</a></td><td>25</td><td></td><td>2000</td></tr>
          <tr class="thead"><th>Rk</th><th>Player</th><th>Age</th><th></th><th>PTS</th></tr>
          <tr><th>2</th><td>Player B</td><td>31</td><td></td><td>1500</td></tr>
        </tbody>
      </table></div></body></html>"#;

    #[test]
    fn build_table_cleans_and_tags() {
        let sigs = default_signatures();
        let t = TablePipeline::new(&sigs)
            .build_table(TOTALS, "totals_stats", None, Season::new(2010))
            .unwrap();
        assert_eq!(t.columns(), ["Rk", "Player", "Age", "PTS", "season_end_year", "season"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.column_values("season"), vec!["2009-10", "2009-10"]);
        assert_eq!(t.column_values("season_end_year"), vec!["2010", "2010"]);
    }

    #[test]
    fn same_input_same_output() {
        let sigs = default_signatures();
        let p = TablePipeline::new(&sigs);
        let a = p.build_table(TOTALS, "totals_stats", None, Season::new(2000)).unwrap();
        let b = p.build_table(TOTALS, "totals_stats", None, Season::new(2000)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.records().collect::<Vec<_>>(), b.records().collect::<Vec<_>>());
    }

    #[test]
    fn missing_table_is_not_found() {
        let sigs = default_signatures();
        let err = TablePipeline::new(&sigs)
            .build_table(TOTALS, "advanced_stats", None, Season::new(2010))
            .unwrap_err();
        assert!(matches!(err, DatasetError::TableNotFound(id) if id == "advanced_stats"));
    }

    #[test]
    fn header_only_table_is_empty() {
        let html = r#"<table id="mvp"><thead><tr><th>Rank</th><th>Player</th></tr></thead><tbody></tbody></table>"#;
        let sigs = default_signatures();
        let err = TablePipeline::new(&sigs)
            .build_table(html, "mvp", None, Season::new(2010))
            .unwrap_err();
        assert!(matches!(err, DatasetError::EmptyTable(_)));
    }

    #[test]
    fn only_repeated_headers_is_empty() {
        let html = r#"<table id="t"><thead><tr><th>Rk</th></tr></thead><tbody><tr><th>Rk</th></tr></tbody></table>"#;
        let sigs = default_signatures();
        let err = TablePipeline::new(&sigs)
            .extract_table(html, "t", None)
            .unwrap_err();
        assert!(matches!(err, DatasetError::EmptyTable(_)));
    }
}
