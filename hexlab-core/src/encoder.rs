//! Hexagram encoder: six price bars to a present and a projected key.
//!
//! The six most recent bars are read newest first: the latest session is the
//! bottom line, the oldest of the six is the top line. A line is moving when its
//! absolute change exceeds 1.5× the mean absolute change of the same six bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{HexagramKey, LinePosition, LineValue, PriceBar};
use crate::error::HexError;

/// Bars consumed per hexagram.
pub const HEXAGRAM_LINES: usize = 6;

/// A line moves when its change exceeds this multiple of the mean change.
pub const MOVING_THRESHOLD_MULTIPLIER: f64 = 1.5;

/// One encoded line with the bar it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDetail {
    pub position: LinePosition,
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    /// Signed fractional change of the bar.
    pub change: f64,
    pub value: LineValue,
}

/// Result of encoding six bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub present: HexagramKey,
    pub projected: HexagramKey,
    pub mean_change: f64,
    pub threshold: f64,
    /// Bottom (most recent bar) first.
    pub lines: Vec<LineDetail>,
}

impl Encoding {
    pub fn moving_positions(&self) -> Vec<LinePosition> {
        self.lines
            .iter()
            .filter(|l| l.value.is_moving())
            .map(|l| l.position)
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.present != self.projected
    }
}

/// Encode the most recent six bars of a chronological series.
///
/// Fails with [`HexError::InsufficientData`] when fewer than six bars are given.
pub fn encode(bars: &[PriceBar]) -> Result<Encoding, HexError> {
    if bars.len() < HEXAGRAM_LINES {
        return Err(HexError::InsufficientData {
            required: HEXAGRAM_LINES,
            available: bars.len(),
        });
    }

    // Newest first: index 0 is the bottom line.
    let window: Vec<&PriceBar> = bars[bars.len() - HEXAGRAM_LINES..].iter().rev().collect();

    let mean_change =
        window.iter().map(|b| b.abs_change()).sum::<f64>() / HEXAGRAM_LINES as f64;
    let threshold = mean_change * MOVING_THRESHOLD_MULTIPLIER;

    let mut values = [LineValue::YoungYin; HEXAGRAM_LINES];
    let mut lines = Vec::with_capacity(HEXAGRAM_LINES);
    for ((bar, position), slot) in window.iter().zip(LinePosition::all()).zip(values.iter_mut()) {
        let is_moving = bar.abs_change() > threshold;
        let value = LineValue::classify(bar.is_up(), is_moving);
        *slot = value;
        lines.push(LineDetail {
            position,
            date: bar.date,
            open: bar.open,
            close: bar.close,
            change: bar.change(),
            value,
        });
    }

    let encoding = Encoding {
        present: HexagramKey::present_of(&values),
        projected: HexagramKey::projected_of(&values),
        mean_change,
        threshold,
        lines,
    };
    tracing::trace!(
        present = %encoding.present,
        projected = %encoding.projected,
        threshold,
        "encoded six bars"
    );
    Ok(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bars in chronological order from (open, close) pairs, oldest first.
    fn bars(pairs: &[(f64, f64)]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(o, c))| {
                PriceBar::new(start + chrono::Duration::days(i as i64), o, c).unwrap()
            })
            .collect()
    }

    #[test]
    fn rejects_fewer_than_six() {
        let err = encode(&bars(&[(10.0, 11.0); 5])).unwrap_err();
        match err {
            HexError::InsufficientData {
                required,
                available,
            } => {
                assert_eq!(required, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
        assert!(matches!(
            encode(&[]),
            Err(HexError::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn most_recent_bar_is_bottom_line() {
        // Only the last (newest) bar is down.
        let series = bars(&[
            (10.0, 10.1),
            (10.0, 10.1),
            (10.0, 10.1),
            (10.0, 10.1),
            (10.0, 10.1),
            (10.0, 9.9),
        ]);
        let enc = encode(&series).unwrap();
        assert_eq!(enc.present.to_string(), "0,1,1,1,1,1");
        assert_eq!(enc.lines[0].date, series[5].date);
        assert_eq!(enc.lines[5].date, series[0].date);
    }

    #[test]
    fn uses_only_the_last_six_bars() {
        let mut pairs = vec![(10.0, 5.0); 10];
        pairs.extend_from_slice(&[(10.0, 10.1); 6]);
        let enc = encode(&bars(&pairs)).unwrap();
        assert_eq!(enc.present.to_string(), "1,1,1,1,1,1");
        assert!(enc.moving_positions().is_empty());
        assert!((enc.mean_change - 0.01).abs() < 1e-12);
    }

    #[test]
    fn flat_series_has_no_moving_lines() {
        let enc = encode(&bars(&[(10.0, 10.0); 6])).unwrap();
        assert_eq!(enc.threshold, 0.0);
        assert!(enc.moving_positions().is_empty());
        assert_eq!(enc.present.to_string(), "1,1,1,1,1,1");
        assert!(!enc.has_changes());
    }

    #[test]
    fn change_is_signed_in_detail() {
        let enc = encode(&bars(&[
            (10.0, 10.0),
            (10.0, 10.0),
            (10.0, 10.0),
            (10.0, 10.0),
            (10.0, 10.0),
            (10.0, 9.0),
        ]))
        .unwrap();
        assert!((enc.lines[0].change + 0.1).abs() < 1e-12);
        assert_eq!(enc.lines[0].value, LineValue::OldYin);
        assert_eq!(enc.projected.to_string(), "1,1,1,1,1,1");
    }
}
