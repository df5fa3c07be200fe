//! Market-data sources: the provider seam, Yahoo Finance, and CSV import.

pub mod csv_import;
pub mod provider;
pub mod window;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use provider::{BarProvider, DataError, DataSource, FetchResult, MemoryProvider};
pub use window::{FetchWindow, DEFAULT_LOOKBACK_DAYS};
pub use yahoo::YahooProvider;
