//! HexagramKey: six bits, bottom line first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::line::LineValue;

/// Six-bit hexagram key. Bit *i* holds line *i*; line 0 is the bottom.
///
/// The text form is the comma-joined bits from bottom to top, e.g. `1,0,0,0,1,0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HexagramKey(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hexagram key '{input}': {reason}")]
pub struct KeyParseError {
    pub input: String,
    pub reason: &'static str,
}

impl HexagramKey {
    pub const LINES: usize = 6;
    pub const COUNT: usize = 1 << Self::LINES;

    /// Build from six 0/1 values, bottom first. Returns `None` on any other value.
    pub fn from_bits(bits: [u8; 6]) -> Option<Self> {
        let mut packed = 0u8;
        for (i, bit) in bits.iter().enumerate() {
            match bit {
                0 => {}
                1 => packed |= 1 << i,
                _ => return None,
            }
        }
        Some(Self(packed))
    }

    /// Key from its packed index (0..64).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self(index as u8))
    }

    pub fn present_of(values: &[LineValue; 6]) -> Self {
        Self::pack(values.iter().map(|v| v.base_bit()))
    }

    pub fn projected_of(values: &[LineValue; 6]) -> Self {
        Self::pack(values.iter().map(|v| v.projected_bit()))
    }

    fn pack(bits: impl Iterator<Item = u8>) -> Self {
        Self(
            bits.enumerate()
                .fold(0u8, |acc, (i, bit)| acc | ((bit & 1) << i)),
        )
    }

    pub fn bit(self, position: usize) -> u8 {
        (self.0 >> position) & 1
    }

    pub fn bits(self) -> [u8; 6] {
        let mut out = [0u8; 6];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.bit(i);
        }
        out
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All 64 keys in index order.
    pub fn all() -> impl Iterator<Item = HexagramKey> {
        (0..Self::COUNT as u8).map(HexagramKey)
    }

    /// Positions where `self` and `other` differ, bottom first.
    pub fn changed_positions(self, other: HexagramKey) -> Vec<usize> {
        let diff = self.0 ^ other.0;
        (0..Self::LINES).filter(|i| (diff >> i) & 1 == 1).collect()
    }
}

impl fmt::Display for HexagramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..Self::LINES {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", self.bit(i))?;
        }
        Ok(())
    }
}

impl FromStr for HexagramKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| KeyParseError {
            input: s.to_string(),
            reason,
        };
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != Self::LINES {
            return Err(err("expected six comma-separated bits"));
        }
        let mut bits = [0u8; 6];
        for (slot, part) in bits.iter_mut().zip(&parts) {
            *slot = match *part {
                "0" => 0,
                "1" => 1,
                _ => return Err(err("each bit must be 0 or 1")),
            };
        }
        HexagramKey::from_bits(bits).ok_or_else(|| err("each bit must be 0 or 1"))
    }
}

impl From<HexagramKey> for String {
    fn from(key: HexagramKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for HexagramKey {
    type Error = KeyParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_bottom_first() {
        let key = HexagramKey::from_bits([1, 0, 0, 0, 1, 0]).unwrap();
        assert_eq!(key.to_string(), "1,0,0,0,1,0");
        assert_eq!(key.bit(0), 1);
        assert_eq!(key.bit(4), 1);
        assert_eq!(key.bit(5), 0);
    }

    #[test]
    fn parse_accepts_comma_separated_bits() {
        let key: HexagramKey = "0,1,0,0,0,1".parse().unwrap();
        assert_eq!(key.bits(), [0, 1, 0, 0, 0, 1]);
        assert_eq!(key.to_string(), "0,1,0,0,0,1");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("1,0,1".parse::<HexagramKey>().is_err());
        assert!("1,0,1,0,1,2".parse::<HexagramKey>().is_err());
        assert!("101010".parse::<HexagramKey>().is_err());
        assert!("".parse::<HexagramKey>().is_err());
    }

    #[test]
    fn from_bits_rejects_non_binary() {
        assert!(HexagramKey::from_bits([0, 0, 3, 0, 0, 0]).is_none());
    }

    #[test]
    fn all_yields_64_distinct_keys() {
        let keys: std::collections::HashSet<_> = HexagramKey::all().collect();
        assert_eq!(keys.len(), 64);
    }

    #[test]
    fn present_and_projected_from_values() {
        use LineValue::*;
        let values = [OldYang, OldYin, YoungYang, YoungYang, YoungYin, OldYin];
        assert_eq!(HexagramKey::present_of(&values).to_string(), "1,0,1,1,0,0");
        assert_eq!(HexagramKey::projected_of(&values).to_string(), "0,1,1,1,0,1");
    }

    #[test]
    fn changed_positions_lists_differences() {
        let a: HexagramKey = "1,1,1,1,1,1".parse().unwrap();
        let b: HexagramKey = "0,1,1,0,1,1".parse().unwrap();
        assert_eq!(a.changed_positions(b), vec![0, 3]);
        assert!(a.changed_positions(a).is_empty());
    }

    #[test]
    fn serde_uses_text_form() {
        let key: HexagramKey = "1,1,0,0,1,0".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"1,1,0,0,1,0\"");
        let back: HexagramKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
