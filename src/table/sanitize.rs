// src/table/sanitize.rs

use super::NormalizedTable;

/// Rank column whose header text repeats inside long tables.
pub const RANK_COLUMN: &str = "Rk";

/// Drop header rows repeated in the table body, detected by a literal `Rk`
/// in the rank column. Tables without that column pass through unchanged.
pub fn strip_repeated_headers(mut table: NormalizedTable) -> NormalizedTable {
    if table.has_column(RANK_COLUMN) {
        table.retain_rows(|row| row.get(RANK_COLUMN).map(String::as_str) != Some(RANK_COLUMN));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cols: &[&str], rows: &[&[&str]]) -> NormalizedTable {
        NormalizedTable::from_rows(
            cols.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn repeated_header_rows_are_removed() {
        let t = strip_repeated_headers(table(
            &["Rk", "Player"],
            &[&["1", "Player A"], &["Rk", "Player"], &["2", "Player B"]],
        ));
        assert_eq!(t.len(), 2);
        assert_eq!(t.column_values("Rk"), vec!["1", "2"]);
        assert_eq!(t.column_values("Player"), vec!["Player A", "Player B"]);
    }

    #[test]
    fn tables_without_rank_pass_through() {
        let before = table(&["Player", "Tm"], &[&["Player", "Tm"], &["X", "BOS"]]);
        let after = strip_repeated_headers(before.clone());
        assert_eq!(before, after);
    }
}
