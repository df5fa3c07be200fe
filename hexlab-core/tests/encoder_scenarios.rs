//! Worked encoder scenarios: fixed bars in, known lines and keys out.

use chrono::{Duration, NaiveDate};
use hexlab_core::domain::{LineValue, PriceBar};
use hexlab_core::encoder::encode;
use hexlab_core::HexError;

/// Build a chronological series from bars listed most-recent first.
fn newest_first(pairs: &[(f64, f64)]) -> Vec<PriceBar> {
    let newest = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let mut bars: Vec<PriceBar> = pairs
        .iter()
        .enumerate()
        .map(|(i, &(o, c))| PriceBar::new(newest - Duration::days(i as i64), o, c).unwrap())
        .collect();
    bars.reverse();
    bars
}

fn codes(values: impl Iterator<Item = LineValue>) -> Vec<u8> {
    values.map(|v| v.code()).collect()
}

#[test]
fn mixed_series_classifies_each_line() {
    // Changes 10%, 10%, 0.2%, 0, 0, 10% → mean ≈ 5.03%, threshold ≈ 7.55%.
    let bars = newest_first(&[
        (10.0, 11.0),
        (10.0, 9.0),
        (10.0, 10.02),
        (10.0, 10.0),
        (10.0, 10.0),
        (10.0, 9.0),
    ]);
    let enc = encode(&bars).unwrap();

    assert!((enc.mean_change - 0.302 / 6.0).abs() < 1e-9);
    assert!((enc.threshold - 1.5 * 0.302 / 6.0).abs() < 1e-9);
    assert_eq!(codes(enc.lines.iter().map(|l| l.value)), vec![9, 6, 7, 7, 7, 6]);
    assert_eq!(enc.present.to_string(), "1,0,1,1,1,0");
    assert_eq!(enc.projected.to_string(), "0,1,1,1,1,1");

    let moving: Vec<usize> = enc.moving_positions().iter().map(|p| p.index()).collect();
    assert_eq!(moving, vec![0, 1, 5]);

    // Same input, same output.
    let again = encode(&bars).unwrap();
    assert_eq!(enc, again);
}

#[test]
fn single_spike_is_the_only_moving_line() {
    // Newest bar +5%, the rest flat: mean 5/6 %, threshold 1.25 %.
    let bars = newest_first(&[
        (100.0, 105.0),
        (100.0, 100.0),
        (100.0, 100.0),
        (100.0, 100.0),
        (100.0, 100.0),
        (100.0, 100.0),
    ]);
    let enc = encode(&bars).unwrap();
    assert_eq!(codes(enc.lines.iter().map(|l| l.value)), vec![9, 7, 7, 7, 7, 7]);
    assert_eq!(enc.lines[0].value.base_bit(), 1);
    assert_eq!(enc.lines[0].value.projected_bit(), 0);
    assert_eq!(enc.present.to_string(), "1,1,1,1,1,1");
    assert_eq!(enc.projected.to_string(), "0,1,1,1,1,1");
}

#[test]
fn spike_against_one_percent_mean() {
    // +5% then ±0.25% moves and one flat bar: mean exactly 1%, threshold 1.5%.
    let bars = newest_first(&[
        (100.0, 105.0),
        (100.0, 100.25),
        (100.0, 99.75),
        (100.0, 100.25),
        (100.0, 99.75),
        (100.0, 100.0),
    ]);
    let enc = encode(&bars).unwrap();
    assert!((enc.mean_change - 0.01).abs() < 1e-12);
    assert!((enc.threshold - 0.015).abs() < 1e-12);
    assert_eq!(codes(enc.lines.iter().map(|l| l.value)), vec![9, 7, 8, 7, 8, 7]);
    assert_eq!(enc.moving_positions().len(), 1);
    assert_eq!(enc.present.to_string(), "1,1,0,1,0,1");
    assert_eq!(enc.projected.to_string(), "0,1,0,1,0,1");
}

#[test]
fn detail_rows_run_most_recent_first() {
    let bars = newest_first(&[
        (50.0, 51.0),
        (50.0, 49.0),
        (50.0, 50.5),
        (50.0, 49.5),
        (50.0, 50.1),
        (50.0, 49.9),
    ]);
    let enc = encode(&bars).unwrap();
    for (i, line) in enc.lines.iter().enumerate() {
        assert_eq!(line.position.index(), i);
    }
    assert!(enc.lines[0].date > enc.lines[5].date);
    assert_eq!(enc.lines[0].close, 51.0);
    assert!((enc.lines[1].change + 0.02).abs() < 1e-12);
}

#[test]
fn five_bars_is_insufficient() {
    let bars = newest_first(&[(1.0, 1.1); 5]);
    match encode(&bars) {
        Err(HexError::InsufficientData {
            required: 6,
            available: 5,
        }) => {}
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}
