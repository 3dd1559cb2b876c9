// src/table/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{Header, NormalizedTable, RawTable};

/// Auto-generated level names such as `Unnamed: 2_level_0` or `Unnamed: 3`.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Unnamed: ?\d+(?:_level_\d+)?$").expect("placeholder regex should compile")
});
static PLACEHOLDER_ANYWHERE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Unnamed: ?\d+(?:_level_\d+)?").expect("placeholder regex should compile")
});

fn is_nan(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case("nan")
}

fn is_filler(label: &str) -> bool {
    let t = label.trim();
    t.is_empty() || is_nan(t) || PLACEHOLDER.is_match(t)
}

/// Join the substantive layers of one column with `_`.
///
/// When every layer is filler the non-`nan` layers are joined verbatim
/// instead, so a structurally present column still gets a name.
pub fn flatten_layers<S: AsRef<str>>(layers: &[S]) -> String {
    let mut parts: Vec<&str> = layers
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !is_filler(l))
        .collect();
    if parts.is_empty() {
        parts = layers
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| !is_nan(l))
            .collect();
    }
    parts.join("_").trim_matches('_').to_string()
}

/// A flattened name that carries no label: blank, or only placeholders.
fn is_vacant(name: &str) -> bool {
    PLACEHOLDER_ANYWHERE
        .replace_all(name, "")
        .trim_matches(|c: char| c == '_' || c.is_whitespace())
        .is_empty()
}

/// Suffix repeats as `X.1`, `X.2`, ... so every name is unique.
fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Flatten headers to single names, then drop columns left without a label.
/// Rows are carried over untouched apart from the dropped cells.
pub fn normalize_columns(table: RawTable) -> NormalizedTable {
    let names: Vec<String> = match &table.header {
        Header::Single(names) => names.clone(),
        Header::Multi(cols) => cols.iter().map(|layers| flatten_layers(layers.as_slice())).collect(),
    };

    let keep: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| !is_vacant(n))
        .map(|(i, _)| i)
        .collect();

    let columns = dedupe(keep.iter().map(|&i| names[i].clone()).collect());
    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            keep.iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    NormalizedTable::from_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi(cols: &[&[&str]], rows: &[&[&str]]) -> RawTable {
        RawTable {
            header: Header::Multi(
                cols.iter()
                    .map(|c| c.iter().map(|s| s.to_string()).collect())
                    .collect(),
            ),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn filler_layers_are_skipped() {
        assert_eq!(flatten_layers(&["Totals", "Unnamed: 1_level_1"]), "Totals");
        assert_eq!(flatten_layers(&["Shooting", "FG%"]), "Shooting_FG%");
        assert_eq!(flatten_layers(&["", "NaN", "PTS"]), "PTS");
        assert_eq!(flatten_layers(&["Unnamed: 0_level_0", "Rk"]), "Rk");
    }

    #[test]
    fn all_filler_falls_back_to_verbatim_join() {
        assert_eq!(flatten_layers(&["Unnamed: 2_level_0", ""]), "Unnamed: 2_level_0");
        assert_eq!(
            flatten_layers(&["Unnamed: 0_level_0", "Unnamed: 0_level_1"]),
            "Unnamed: 0_level_0_Unnamed: 0_level_1"
        );
        assert_eq!(flatten_layers(&["nan", ""]), "");
    }

    #[test]
    fn empty_columns_are_dropped_after_flattening() {
        let t = normalize_columns(multi(
            &[&["", "Rk"], &["Unnamed: 2_level_0", ""], &["Totals", "Unnamed: 1_level_1"]],
            &[&["1", "", "10"]],
        ));
        assert_eq!(t.columns(), ["Rk", "Totals"]);
        assert_eq!(t.records().next().unwrap(), vec!["1", "10"]);
    }

    #[test]
    fn single_level_names_are_kept_verbatim() {
        let t = normalize_columns(RawTable {
            header: Header::Single(vec!["Rk".into(), "".into(), "W/L%".into()]),
            rows: vec![vec!["1".into(), "".into(), ".500".into()]],
        });
        assert_eq!(t.columns(), ["Rk", "W/L%"]);
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let t = normalize_columns(RawTable {
            header: Header::Single(vec!["G".into(), "G".into(), "G".into()]),
            rows: vec![vec!["1".into(), "2".into(), "3".into()]],
        });
        assert_eq!(t.columns(), ["G", "G.1", "G.2"]);
        assert_eq!(t.get(0, "G.2"), Some("3"));
    }
}
