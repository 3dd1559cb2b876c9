// src/table/locate.rs

//! Find one table in a page by its `id`, trying progressively looser
//! strategies. Strategy failures are logged and never returned to callers.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use super::html::parse_table;
use super::RawTable;
use crate::error::ParseError;

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("`table` selector should parse"));

/// Resolution strategies, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Scan every table in the document for a matching `id`.
    DirectParse,
    /// Select `table[id=...]`, re-parse just that fragment.
    TargetedElement,
    /// Look inside comment nodes that mention the id.
    CommentUnwrap,
    /// Pick any table by column signature. Needs a fallback URL.
    Heuristic,
}

impl LocateStrategy {
    pub const ORDER: [LocateStrategy; 4] = [
        LocateStrategy::DirectParse,
        LocateStrategy::TargetedElement,
        LocateStrategy::CommentUnwrap,
        LocateStrategy::Heuristic,
    ];
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocateStrategy::DirectParse => "direct",
            LocateStrategy::TargetedElement => "targeted",
            LocateStrategy::CommentUnwrap => "comment",
            LocateStrategy::Heuristic => "heuristic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub strategy: LocateStrategy,
    pub table: RawTable,
}

/// Outcome of a single strategy: `Ok(None)` means "nothing here".
pub type StrategyResult = Result<Option<RawTable>, ParseError>;

pub struct Locator<'a> {
    signatures: &'a [Vec<String>],
}

impl<'a> Locator<'a> {
    /// `signatures` are column sets for the heuristic fallback, highest
    /// priority first.
    pub fn new(signatures: &'a [Vec<String>]) -> Self {
        Self { signatures }
    }

    pub fn locate(&self, html: &str, table_id: &str, fallback_url: Option<&Url>) -> Option<Located> {
        let doc = Html::parse_document(html);
        for strategy in LocateStrategy::ORDER {
            if strategy == LocateStrategy::Heuristic {
                warn!(table_id, "table not found by id");
            }
            match self.run(strategy, &doc, table_id, fallback_url) {
                Ok(Some(table)) => {
                    debug!(table_id, %strategy, rows = table.rows.len(), "located table");
                    return Some(Located { strategy, table });
                }
                Ok(None) => debug!(table_id, %strategy, "no match"),
                Err(e) => debug!(table_id, %strategy, error = %e, "strategy failed"),
            }
        }
        None
    }

    pub fn run(
        &self,
        strategy: LocateStrategy,
        doc: &Html,
        table_id: &str,
        fallback_url: Option<&Url>,
    ) -> StrategyResult {
        match strategy {
            LocateStrategy::DirectParse => direct_parse(doc, table_id),
            LocateStrategy::TargetedElement => targeted_element(doc, table_id),
            LocateStrategy::CommentUnwrap => comment_unwrap(doc, table_id),
            LocateStrategy::Heuristic => match fallback_url {
                Some(url) => {
                    debug!(%url, "scanning all tables");
                    heuristic(doc, self.signatures)
                }
                None => Ok(None),
            },
        }
    }
}

fn has_id(el: &ElementRef<'_>, table_id: &str) -> bool {
    el.value().attr("id") == Some(table_id)
}

/// First table carrying `id == table_id`, anywhere in the parsed tree.
pub fn direct_parse(doc: &Html, table_id: &str) -> StrategyResult {
    match doc.select(&TABLE).find(|t| has_id(t, table_id)) {
        Some(el) => parse_table(el).map(Some),
        None => Ok(None),
    }
}

/// Select the element by id and parse a fresh fragment of just its markup.
pub fn targeted_element(doc: &Html, table_id: &str) -> StrategyResult {
    let css = format!(
        r#"table[id="{}"]"#,
        table_id.replace('\\', "\\\\").replace('"', "\\\"")
    );
    let sel = Selector::parse(&css).map_err(|_| ParseError::Selector(css.clone()))?;
    let Some(el) = doc.select(&sel).next() else {
        return Ok(None);
    };
    let fragment = Html::parse_fragment(&el.html());
    match fragment.select(&TABLE).next() {
        Some(table) => parse_table(table).map(Some),
        None => Err(ParseError::NotATable),
    }
}

/// Tables hidden in `<!-- ... -->`. Every comment mentioning the id is tried
/// until one yields the table.
pub fn comment_unwrap(doc: &Html, table_id: &str) -> StrategyResult {
    let mut last_err = None;
    for node in doc.tree.nodes() {
        let Node::Comment(c) = node.value() else {
            continue;
        };
        let text: &str = &c.comment;
        if !text.contains(table_id) {
            continue;
        }
        let fragment = Html::parse_fragment(text);
        match direct_parse(&fragment, table_id) {
            Ok(Some(t)) => return Ok(Some(t)),
            Ok(None) => {}
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Any table whose innermost column labels cover a signature, signatures in
/// priority order; otherwise the first table with data rows.
pub fn heuristic(doc: &Html, signatures: &[Vec<String>]) -> StrategyResult {
    let tables: Vec<RawTable> = doc
        .select(&TABLE)
        .filter_map(|el| match parse_table(el) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!(error = %e, "skipping unparsable table");
                None
            }
        })
        .collect();

    for want in signatures {
        for t in &tables {
            let cols: HashSet<&str> = t.header.leaf_labels().into_iter().collect();
            if want.iter().all(|w| cols.contains(w.as_str())) {
                return Ok(Some(t.clone()));
            }
        }
    }
    Ok(tables.into_iter().find(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_signatures;
    use crate::table::Header;

    const VISIBLE: &str = r#"<html><body>
        <table id="per_game_stats"><thead><tr><th>Rk</th><th>Player</th></tr></thead>
        <tbody><tr><td>1</td><td>A</td></tr></tbody></table>
        </body></html>"#;

    const COMMENTED: &str = r#"<html><body>
        <div id="all_confs_standings_E"><!--
        <table id="other"><tr><th>x</th></tr><tr><td>1</td></tr></table>
        --></div>
        <div id="all_confs_standings_W"><!--
          <table id="confs_standings_W"><thead><tr><th>Western Conference</th><th>W</th></tr></thead>
          <tbody><tr><th>Denver Nuggets*</th><td>57</td></tr></tbody></table>
        --></div>
        </body></html>"#;

    fn url() -> Url {
        Url::parse("https://example.com/leagues/NBA_2023_standings.html").unwrap()
    }

    #[test]
    fn direct_parse_wins_when_visible() {
        let sigs = default_signatures();
        let got = Locator::new(&sigs).locate(VISIBLE, "per_game_stats", None).unwrap();
        assert_eq!(got.strategy, LocateStrategy::DirectParse);
        assert_eq!(got.table.rows, vec![vec!["1", "A"]]);
    }

    #[test]
    fn targeted_element_parses_fragment() {
        let doc = Html::parse_document(VISIBLE);
        let t = targeted_element(&doc, "per_game_stats").unwrap().unwrap();
        assert_eq!(t.header, Header::Single(vec!["Rk".into(), "Player".into()]));
        assert_eq!(targeted_element(&doc, "nope").unwrap(), None);
    }

    #[test]
    fn targeted_element_escapes_quotes() {
        let doc = Html::parse_document(r#"<table id='a"b'><tr><td>1</td></tr></table>"#);
        let t = targeted_element(&doc, "a\"b").unwrap().unwrap();
        assert_eq!(t.rows, vec![vec!["1"]]);
    }

    #[test]
    fn comment_embedded_table_is_found() {
        let sigs = default_signatures();
        let got = Locator::new(&sigs)
            .locate(COMMENTED, "confs_standings_W", None)
            .unwrap();
        assert_eq!(got.strategy, LocateStrategy::CommentUnwrap);
        assert_eq!(got.table.rows, vec![vec!["Denver Nuggets*", "57"]]);
    }

    #[test]
    fn broken_visible_table_falls_through_to_comment() {
        let html = r#"<html><body>
            <table id="mvp"></table>
            <div id="all_mvp"><!--
              <table id="mvp"><tr><th>Rank</th><th>Player</th></tr><tr><td>1</td><td>X</td></tr></table>
            --></div>
            </body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(direct_parse(&doc, "mvp"), Err(ParseError::NoRows));
        assert_eq!(targeted_element(&doc, "mvp"), Err(ParseError::NoRows));

        let sigs = default_signatures();
        let got = Locator::new(&sigs).locate(html, "mvp", None).unwrap();
        assert_eq!(got.strategy, LocateStrategy::CommentUnwrap);
        assert_eq!(got.table.rows, vec![vec!["1", "X"]]);
    }

    #[test]
    fn comments_are_invisible_to_direct_strategies() {
        let doc = Html::parse_document(COMMENTED);
        assert_eq!(direct_parse(&doc, "confs_standings_W").unwrap(), None);
        assert_eq!(targeted_element(&doc, "confs_standings_W").unwrap(), None);
    }

    #[test]
    fn not_found_without_fallback_url() {
        let sigs = default_signatures();
        assert!(Locator::new(&sigs).locate(VISIBLE, "advanced_stats", None).is_none());
    }

    #[test]
    fn heuristic_uses_signature_priority() {
        let html = r#"<table id="a"><tr><th>Team</th><th>W</th></tr><tr><td>BOS</td><td>1</td></tr></table>
                      <table id="b"><tr><th>Player</th><th>Tm</th></tr><tr><td>X</td><td>BOS</td></tr></table>"#;
        let sigs = default_signatures();
        let u = url();
        let got = Locator::new(&sigs).locate(html, "missing", Some(&u)).unwrap();
        assert_eq!(got.strategy, LocateStrategy::Heuristic);
        assert_eq!(got.table.rows, vec![vec!["X", "BOS"]]);
    }

    #[test]
    fn heuristic_falls_back_to_first_non_empty() {
        let html = r#"<table><tr><th>a</th></tr></table>
                      <table><tr><th>b</th></tr><tr><td>2</td></tr></table>"#;
        let sigs = default_signatures();
        let u = url();
        let got = Locator::new(&sigs).locate(html, "missing", Some(&u)).unwrap();
        assert_eq!(got.table.rows, vec![vec!["2"]]);
    }

    #[test]
    fn heuristic_with_no_tables_is_not_found() {
        let sigs = default_signatures();
        let u = url();
        assert!(Locator::new(&sigs).locate("<p>nothing</p>", "x", Some(&u)).is_none());
    }
}
