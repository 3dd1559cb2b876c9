// src/error.rs

use thiserror::Error;

/// Transport-level failure from a [`crate::fetch::PageSource`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("reading body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Other(String),
}

/// Failure of a single Locator strategy. Never leaves the locator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("element is not a <table>")]
    NotATable,
    #[error("table has no rows")]
    NoRows,
}

/// Why a dataset produced no output. All variants are non-fatal for the run.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no HTML: {0}")]
    Fetch(#[from] FetchError),
    #[error("table `{0}` not found")]
    TableNotFound(String),
    #[error("table `{0}` has no data rows")]
    EmptyTable(String),
    #[error("writing output: {0:#}")]
    Write(anyhow::Error),
}

/// Misconfiguration that aborts the run before any fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid season range {start}..={end}: years must lie in {min}..={max}")]
    InvalidSeasonRange {
        start: u16,
        end: u16,
        min: u16,
        max: u16,
    },
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
