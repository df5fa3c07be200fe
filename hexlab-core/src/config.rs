//! Hexlab configuration: TOML file with serde defaults.
//!
//! Every key is optional; a missing file is the same as an empty one.
//!
//! ```toml
//! lookback_days = 40
//!
//! [data]
//! source = "csv"
//! csv_dir = "/srv/bars"
//!
//! [divination]
//! seed = 7
//!
//! [log]
//! level = "debug"
//!
//! [[instruments]]
//! symbol = "CL=F"
//! label = "WTI Crude"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{BarProvider, CsvProvider, DataError, YahooProvider, DEFAULT_LOOKBACK_DAYS};
use crate::instruments::{Catalog, Instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which provider serves market bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,
    pub csv_dir: Option<PathBuf>,
    /// Alternate Yahoo host.
    pub yahoo_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DivinationConfig {
    /// Master seed for reproducible castings. Unset means OS entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "info" or "hexlab_core=debug".
    pub level: String,
    /// Log file directory for the TUI. Defaults next to the config file.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexlabConfig {
    pub lookback_days: u32,
    pub data: DataConfig,
    pub divination: DivinationConfig,
    pub log: LogConfig,
    pub instruments: Vec<Instrument>,
}

impl Default for HexlabConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            data: DataConfig::default(),
            divination: DivinationConfig::default(),
            log: LogConfig::default(),
            instruments: Catalog::energy_futures().iter().cloned().collect(),
        }
    }
}

impl HexlabConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days < 6 {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be at least 6, got {}",
                self.lookback_days
            )));
        }
        if self.instruments.is_empty() {
            return Err(ConfigError::Invalid("instrument list is empty".into()));
        }
        if self.data.source == SourceKind::Csv && self.data.csv_dir.is_none() {
            return Err(ConfigError::Invalid(
                "data.source = \"csv\" requires data.csv_dir".into(),
            ));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.instruments.clone())
    }

    /// Build the configured market-data provider.
    pub fn provider(&self) -> Result<Box<dyn BarProvider>, DataError> {
        match (self.data.source, &self.data.csv_dir) {
            (SourceKind::Csv, Some(dir)) => Ok(Box::new(CsvProvider::from_dir(dir))),
            (SourceKind::Csv, None) => Err(DataError::Other("no csv_dir configured".into())),
            (SourceKind::Yahoo, _) => {
                let provider = match &self.data.yahoo_base_url {
                    Some(url) => YahooProvider::with_base_url(url)?,
                    None => YahooProvider::new()?,
                };
                Ok(Box::new(provider))
            }
        }
    }
}

/// `<config_dir>/hexlab`, falling back to the working directory.
pub fn config_home() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hexlab")
}

pub fn default_config_path() -> PathBuf {
    config_home().join("config.toml")
}
