// src/table/mod.rs

//! Table model shared by the locator, normalizer, sanitizer and pipeline.
//!
//! Data flows one way: HTML text → [`RawTable`] → [`NormalizedTable`] →
//! season-tagged [`NormalizedTable`] → file.

pub mod html;
pub mod locate;
pub mod normalize;
pub mod pipeline;
pub mod sanitize;

use std::collections::HashMap;
use std::fmt;

pub use locate::{Located, LocateStrategy, Locator};
pub use normalize::normalize_columns;
pub use pipeline::{tag_season, TablePipeline};
pub use sanitize::strip_repeated_headers;

/// Header structure of a located table, one entry per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Single(Vec<String>),
    /// Label layers per column, outer to inner.
    Multi(Vec<Vec<String>>),
}

impl Header {
    pub fn width(&self) -> usize {
        match self {
            Header::Single(names) => names.len(),
            Header::Multi(cols) => cols.len(),
        }
    }

    /// Innermost label of each column.
    pub fn leaf_labels(&self) -> Vec<&str> {
        match self {
            Header::Single(names) => names.iter().map(String::as_str).collect(),
            Header::Multi(cols) => cols
                .iter()
                .map(|layers| layers.last().map(String::as_str).unwrap_or(""))
                .collect(),
        }
    }
}

/// Cell grid as it came out of the HTML, header separated from body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub header: Header,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub type Row = HashMap<String, String>;

/// Named, uniquely-labelled columns over string-valued rows.
///
/// Column order lives in `columns`; rows are keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl NormalizedTable {
    /// Build from positional rows. Short rows are padded with empty strings,
    /// extra cells are ignored.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(columns.len(), String::new());
                columns.iter().cloned().zip(cells).collect::<Row>()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No data rows, or nothing left to put in them.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Values of one column in row order; missing cells read as "".
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.get(column).map(String::as_str).unwrap_or(""))
            .collect()
    }

    /// Row values in column order.
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(|r| self.column_values_of(r))
    }

    fn column_values_of<'a>(&'a self, row: &'a Row) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
            .collect()
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Rename `from` to `to` in place. Refuses when `from` is missing or `to`
    /// would collide with another column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.has_column(from);
        }
        if self.has_column(to) {
            return false;
        }
        let Some(slot) = self.columns.iter_mut().find(|c| c.as_str() == from) else {
            return false;
        };
        *slot = to.to_string();
        for row in &mut self.rows {
            if let Some(v) = row.remove(from) {
                row.insert(to.to_string(), v);
            }
        }
        true
    }

    /// Set `name` to `value` on every row, appending the column if new.
    pub fn push_constant_column(&mut self, name: &str, value: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
        for row in &mut self.rows {
            row.insert(name.to_string(), value.to_string());
        }
    }

    /// Stack tables row-wise. The column list is the union in first-seen
    /// order; cells a table lacks read as "".
    pub fn concat<I>(tables: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut out: Option<Self> = None;
        for t in tables {
            match out.as_mut() {
                None => out = Some(t),
                Some(acc) => {
                    for c in t.columns {
                        if !acc.has_column(&c) {
                            acc.columns.push(c);
                        }
                    }
                    acc.rows.extend(t.rows);
                }
            }
        }
        if let Some(acc) = out.as_mut() {
            let columns = acc.columns.clone();
            for row in &mut acc.rows {
                for c in &columns {
                    row.entry(c.clone()).or_default();
                }
            }
        }
        out
    }
}

/// A season, keyed by the calendar year it ends in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season {
    pub end_year: u16,
}

impl Season {
    pub fn new(end_year: u16) -> Self {
        Self { end_year }
    }

    /// `2010` → `"2009-10"`, `2000` → `"1999-00"`.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.end_year.saturating_sub(1), self.end_year % 100)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.end_year)
    }
}
