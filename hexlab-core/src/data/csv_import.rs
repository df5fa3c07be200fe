//! CSV import provider.
//!
//! Reads daily bars from CSV files with at least `Date`, `Open`, and `Close`
//! columns (header match is case-insensitive; other columns are ignored). This
//! is the format a spreadsheet or a Yahoo download export produces.
//!
//! A provider is either rooted at a directory, where `<dir>/<SYMBOL>.csv` is
//! read per symbol, or pinned to one file that serves any symbol.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::provider::{BarProvider, DataError, DataSource, FetchResult};
use crate::domain::PriceBar;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone)]
enum Location {
    Dir(PathBuf),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    location: Location,
}

impl CsvProvider {
    /// Serve `<dir>/<SYMBOL>.csv`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::Dir(dir.into()),
        }
    }

    /// Serve a single file regardless of the requested symbol.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
        }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        match &self.location {
            Location::Dir(dir) => dir.join(format!("{symbol}.csv")),
            Location::File(path) => path.clone(),
        }
    }

    /// Read every usable bar from a CSV file, sorted chronologically.
    pub fn read_file(path: &Path) -> Result<Vec<PriceBar>, DataError> {
        let csv_err = |message: String| DataError::Csv {
            path: path.display().to_string(),
            message,
        };
        // Unreadable files are i/o failures; malformed content is a csv failure.
        let read_err = |e: csv::Error| {
            if e.is_io_error() {
                DataError::Io(format!("{}: {e}", path.display()))
            } else {
                csv_err(e.to_string())
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(read_err)?;

        let headers = reader.headers().map_err(read_err)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| csv_err(format!("missing '{name}' column")))
        };
        let date_col = column("date")?;
        let open_col = column("open")?;
        let close_col = column("close")?;

        let mut bars = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(read_err)?;
            let line = row + 2;

            let raw_date = record.get(date_col).unwrap_or_default();
            let date = parse_date(raw_date)
                .ok_or_else(|| csv_err(format!("line {line}: unreadable date '{raw_date}'")))?;

            let open = parse_price(record.get(open_col));
            let close = parse_price(record.get(close_col));
            let (Some(open), Some(close)) = (open, close) else {
                tracing::debug!(%date, "skipping csv row without open/close");
                continue;
            };

            match PriceBar::new(date, open, close) {
                Ok(bar) => bars.push(bar),
                Err(e) => tracing::warn!(path = %path.display(), "skipping unusable bar: {e}"),
            }
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Accept timestamps such as "2024-01-02 00:00:00-05:00" by their date part.
    let head = raw.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

impl BarProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let bars: Vec<PriceBar> = Self::read_file(&path)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        tracing::info!(%symbol, bars = bars.len(), path = %path.display(), "loaded bars from csv");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_date("2024-01-02"), Some(expected));
        assert_eq!(parse_date("2024/01/02"), Some(expected));
        assert_eq!(parse_date("01/02/2024"), Some(expected));
        assert_eq!(parse_date("2024-01-02 00:00:00-05:00"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the symbol file should be exists but cannot be read.
        std::fs::create_dir(dir.path().join("NG=F.csv")).unwrap();
        let provider = CsvProvider::from_dir(dir.path());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(matches!(
            provider.fetch("NG=F", start, end),
            Err(DataError::Io(_))
        ));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BZ=F.csv");
        std::fs::write(&path, "Date,Close\n2024-01-02,80.1\n").unwrap();
        assert!(matches!(
            CsvProvider::read_file(&path),
            Err(DataError::Csv { .. })
        ));
    }

    #[test]
    fn parse_price_handles_blanks() {
        assert_eq!(parse_price(Some("82.5")), Some(82.5));
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(Some("null")), None);
        assert_eq!(parse_price(None), None);
    }
}
