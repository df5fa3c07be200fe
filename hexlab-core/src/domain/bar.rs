//! PriceBar: one trading session's open and close.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily bar reduced to what the encoder reads.
///
/// `open` is always finite and strictly positive: it is the denominator of
/// every change fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {date}: open must be positive, got {open}")]
    NonPositiveOpen { date: NaiveDate, open: f64 },

    #[error("bar {date}: {field} is not a finite number")]
    NonFinite { date: NaiveDate, field: &'static str },
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Result<Self, BarError> {
        if !open.is_finite() {
            return Err(BarError::NonFinite { date, field: "open" });
        }
        if !close.is_finite() {
            return Err(BarError::NonFinite {
                date,
                field: "close",
            });
        }
        if open <= 0.0 {
            return Err(BarError::NonPositiveOpen { date, open });
        }
        Ok(Self { date, open, close })
    }

    /// Signed fractional change, `(close - open) / open`.
    pub fn change(&self) -> f64 {
        (self.close - self.open) / self.open
    }

    pub fn abs_change(&self) -> f64 {
        self.change().abs()
    }

    /// A flat bar counts as up.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn change_is_signed_fraction_of_open() {
        let bar = PriceBar::new(day(), 10.0, 9.0).unwrap();
        assert!((bar.change() + 0.1).abs() < 1e-12);
        assert!((bar.abs_change() - 0.1).abs() < 1e-12);
        assert!(!bar.is_up());
    }

    #[test]
    fn flat_bar_is_up() {
        let bar = PriceBar::new(day(), 10.0, 10.0).unwrap();
        assert!(bar.is_up());
        assert_eq!(bar.change(), 0.0);
    }

    #[test]
    fn rejects_zero_open() {
        let err = PriceBar::new(day(), 0.0, 1.0).unwrap_err();
        assert!(matches!(err, BarError::NonPositiveOpen { .. }));
    }

    #[test]
    fn rejects_nan_close() {
        let err = PriceBar::new(day(), 1.0, f64::NAN).unwrap_err();
        assert_eq!(
            err,
            BarError::NonFinite {
                date: day(),
                field: "close"
            }
        );
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = PriceBar::new(day(), 82.5, 83.1).unwrap();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
