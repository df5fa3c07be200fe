//! Instrument catalog: the symbols offered in the market picker.
//!
//! The default catalog is the four energy futures the dashboard started with.
//! A config file may replace it with any list of Yahoo symbols.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub label: String,
}

impl Instrument {
    pub fn new(symbol: &str, label: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

impl Catalog {
    /// Build from a list; duplicate symbols keep their first entry.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let instruments = instruments
            .into_iter()
            .filter(|i| seen.insert(i.symbol.clone()))
            .collect();
        Self { instruments }
    }

    /// Brent, Henry Hub gas, Dutch TTF gas, RBOB gasoline.
    pub fn energy_futures() -> Self {
        Self::new(vec![
            Instrument::new("BZ=F", "Brent Crude"),
            Instrument::new("NG=F", "Natural Gas"),
            Instrument::new("TTF=F", "Dutch TTF"),
            Instrument::new("RB=F", "RBOB Gasoline"),
        ])
    }

    pub fn find(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn get(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.instruments
            .iter()
            .position(|i| i.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::energy_futures()
    }
}
