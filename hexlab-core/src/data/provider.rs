//! Data provider trait and structured error types.
//!
//! The BarProvider trait abstracts over data sources (Yahoo Finance, CSV import)
//! so the request boundary can swap implementations and tests can supply bars
//! from memory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceBar;

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider returned HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("i/o error: {0}")]
    Io(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    /// Chronological, oldest first.
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Memory,
}

/// Trait for daily-bar providers.
///
/// Implementations return bars inside `[start, end]` in chronological order.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

/// In-memory provider, keyed by symbol. Used by tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    series: std::collections::HashMap<String, Vec<PriceBar>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        self.series.insert(symbol.to_string(), bars);
        self
    }
}

impl BarProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .copied()
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Memory,
        })
    }
}
