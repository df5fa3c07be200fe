//! Coin-toss divination.
//!
//! Each line is three fair coins, heads = 3 and tails = 2. The sum lands on
//! 6, 7, 8, or 9 with probabilities 1/8, 3/8, 3/8, 1/8.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{HexagramKey, LineValue};
use crate::encoder::HEXAGRAM_LINES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coin {
    Heads,
    Tails,
}

impl Coin {
    pub fn value(self) -> u8 {
        match self {
            Coin::Heads => 3,
            Coin::Tails => 2,
        }
    }
}

/// One cast line: the three coins and the value they sum to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastLine {
    pub tosses: [Coin; 3],
    pub value: LineValue,
}

/// Six cast lines, bottom first, with the keys they resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casting {
    pub lines: [CastLine; HEXAGRAM_LINES],
    pub present: HexagramKey,
    pub projected: HexagramKey,
}

impl Casting {
    pub fn values(&self) -> [LineValue; HEXAGRAM_LINES] {
        self.lines.map(|l| l.value)
    }

    pub fn has_changes(&self) -> bool {
        self.present != self.projected
    }
}

pub fn toss<R: Rng + ?Sized>(rng: &mut R) -> Coin {
    if rng.gen_bool(0.5) {
        Coin::Heads
    } else {
        Coin::Tails
    }
}

pub fn cast_line<R: Rng + ?Sized>(rng: &mut R) -> CastLine {
    let tosses = [toss(rng), toss(rng), toss(rng)];
    let sum: u8 = tosses.iter().map(|c| c.value()).sum();
    let value = match sum {
        6 => LineValue::OldYin,
        7 => LineValue::YoungYang,
        8 => LineValue::YoungYin,
        _ => LineValue::OldYang,
    };
    CastLine { tosses, value }
}

/// Cast six lines, bottom first.
pub fn cast<R: Rng + ?Sized>(rng: &mut R) -> Casting {
    let lines = [
        cast_line(rng),
        cast_line(rng),
        cast_line(rng),
        cast_line(rng),
        cast_line(rng),
        cast_line(rng),
    ];
    let values = lines.map(|l| l.value);
    Casting {
        lines,
        present: HexagramKey::present_of(&values),
        projected: HexagramKey::projected_of(&values),
    }
}
