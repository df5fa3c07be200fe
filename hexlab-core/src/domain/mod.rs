//! Domain types for Hexlab

pub mod bar;
pub mod key;
pub mod line;

pub use bar::{BarError, PriceBar};
pub use key::{HexagramKey, KeyParseError};
pub use line::{LinePosition, LineValue};
