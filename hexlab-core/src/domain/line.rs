//! Line values and positions.
//!
//! A line carries one of the four traditional codes. The code alone decides
//! the line's bit in the present hexagram, its bit in the projected hexagram,
//! and whether it is moving:
//!
//! | code | name      | base | projected | moving |
//! |------|-----------|------|-----------|--------|
//! | 6    | old yin   | 0    | 1         | yes    |
//! | 7    | young yang| 1    | 1         | no     |
//! | 8    | young yin | 0    | 0         | no     |
//! | 9    | old yang  | 1    | 0         | yes    |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LineValue {
    OldYin,
    YoungYang,
    YoungYin,
    OldYang,
}

impl LineValue {
    pub const ALL: [LineValue; 4] = [
        LineValue::OldYin,
        LineValue::YoungYang,
        LineValue::YoungYin,
        LineValue::OldYang,
    ];

    pub fn code(self) -> u8 {
        match self {
            LineValue::OldYin => 6,
            LineValue::YoungYang => 7,
            LineValue::YoungYin => 8,
            LineValue::OldYang => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            6 => Some(LineValue::OldYin),
            7 => Some(LineValue::YoungYang),
            8 => Some(LineValue::YoungYin),
            9 => Some(LineValue::OldYang),
            _ => None,
        }
    }

    /// Up bars are yang, down bars are yin; moving bars are the old variants.
    pub fn classify(is_up: bool, is_moving: bool) -> Self {
        match (is_up, is_moving) {
            (true, true) => LineValue::OldYang,
            (true, false) => LineValue::YoungYang,
            (false, true) => LineValue::OldYin,
            (false, false) => LineValue::YoungYin,
        }
    }

    pub fn is_yang(self) -> bool {
        matches!(self, LineValue::YoungYang | LineValue::OldYang)
    }

    pub fn is_moving(self) -> bool {
        matches!(self, LineValue::OldYin | LineValue::OldYang)
    }

    /// Bit in the present hexagram.
    pub fn base_bit(self) -> u8 {
        match self {
            LineValue::YoungYang | LineValue::OldYang => 1,
            LineValue::YoungYin | LineValue::OldYin => 0,
        }
    }

    /// Bit in the projected hexagram: old lines flip, young lines hold.
    pub fn projected_bit(self) -> u8 {
        match self {
            LineValue::OldYang => 0,
            LineValue::OldYin => 1,
            LineValue::YoungYang => 1,
            LineValue::YoungYin => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LineValue::OldYin => "Old Yin (6)",
            LineValue::YoungYang => "Yang (7)",
            LineValue::YoungYin => "Yin (8)",
            LineValue::OldYang => "Old Yang (9)",
        }
    }
}

impl From<LineValue> for u8 {
    fn from(value: LineValue) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for LineValue {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        LineValue::from_code(code).ok_or_else(|| format!("invalid line code {code}"))
    }
}

/// Line position, 0 = bottom (most recent bar) through 5 = top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinePosition(u8);

impl LinePosition {
    pub const COUNT: usize = 6;

    pub fn new(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = LinePosition> {
        (0..Self::COUNT as u8).map(LinePosition)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Bottom",
            1 => "Second",
            2 => "Third",
            3 => "Fourth",
            4 => "Fifth",
            _ => "Top",
        }
    }

    pub fn traditional_name(self) -> &'static str {
        match self.0 {
            0 => "初爻",
            1 => "二爻",
            2 => "三爻",
            3 => "四爻",
            4 => "五爻",
            _ => "上爻",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yang_values_have_base_bit_one() {
        assert_eq!(LineValue::YoungYang.base_bit(), 1);
        assert_eq!(LineValue::OldYang.base_bit(), 1);
        assert_eq!(LineValue::YoungYin.base_bit(), 0);
        assert_eq!(LineValue::OldYin.base_bit(), 0);
    }

    #[test]
    fn old_lines_flip_young_lines_hold() {
        assert_eq!(LineValue::OldYang.projected_bit(), 0);
        assert_eq!(LineValue::OldYin.projected_bit(), 1);
        for v in [LineValue::YoungYang, LineValue::YoungYin] {
            assert_eq!(v.projected_bit(), v.base_bit());
        }
    }

    #[test]
    fn moving_iff_six_or_nine() {
        for v in LineValue::ALL {
            assert_eq!(v.is_moving(), matches!(v.code(), 6 | 9));
        }
    }

    #[test]
    fn classify_covers_all_four() {
        assert_eq!(LineValue::classify(true, true).code(), 9);
        assert_eq!(LineValue::classify(true, false).code(), 7);
        assert_eq!(LineValue::classify(false, true).code(), 6);
        assert_eq!(LineValue::classify(false, false).code(), 8);
    }

    #[test]
    fn code_roundtrip_and_rejects_others() {
        for v in LineValue::ALL {
            assert_eq!(LineValue::from_code(v.code()), Some(v));
        }
        assert_eq!(LineValue::from_code(5), None);
        assert_eq!(LineValue::from_code(10), None);
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&LineValue::OldYang).unwrap(), "9");
        let v: LineValue = serde_json::from_str("6").unwrap();
        assert_eq!(v, LineValue::OldYin);
        assert!(serde_json::from_str::<LineValue>("5").is_err());
    }

    #[test]
    fn positions_are_bounded() {
        assert_eq!(LinePosition::all().count(), 6);
        assert!(LinePosition::new(6).is_none());
        assert_eq!(LinePosition::new(0).unwrap().label(), "Bottom");
        assert_eq!(LinePosition::new(5).unwrap().traditional_name(), "上爻");
    }
}
