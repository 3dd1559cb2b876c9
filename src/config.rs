// src/config.rs

use serde::Deserialize;
use std::{fs, ops::RangeInclusive, path::Path, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0 Safari/537.36";
pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";

/// First and last season end years accepted on the command line.
pub const MIN_SEASON: u16 = 1947;
pub const MAX_SEASON: u16 = 2100;

/// Output file format for persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Everything the scraper needs besides the season range.
///
/// Every field has a default, so a YAML file only has to name what it overrides:
///
/// ```yaml
/// pause_secs: 5
/// signatures:
///   - [Player, Team]
///   - [Team, W]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Sleep after every fetch, successful or not.
    pub pause_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub base_url: String,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    /// Column sets tried in order by the heuristic locator fallback.
    pub signatures: Vec<Vec<String>>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            pause_secs: 3,
            max_retries: 2,
            backoff_ms: 500,
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("data"),
            format: OutputFormat::Csv,
            signatures: default_signatures(),
        }
    }
}

pub fn default_signatures() -> Vec<Vec<String>> {
    [&["Player", "Tm"][..], &["Team", "W"], &["Rank", "Player"]]
        .iter()
        .map(|set| set.iter().map(|s| s.to_string()).collect())
        .collect()
}

impl ScrapeConfig {
    /// Parse a YAML document; absent keys keep their defaults.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        // an empty file deserializes to unit, not a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text, &path.display().to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

/// Normalize a user-supplied season range: reversed bounds are swapped,
/// out-of-range years are rejected.
pub fn season_range(start: u16, end: u16) -> Result<RangeInclusive<u16>, ConfigError> {
    let (lo, hi) = if start > end { (end, start) } else { (start, end) };
    if lo < MIN_SEASON || hi > MAX_SEASON {
        return Err(ConfigError::InvalidSeasonRange {
            start,
            end,
            min: MIN_SEASON,
            max: MAX_SEASON,
        });
    }
    Ok(lo..=hi)
}
