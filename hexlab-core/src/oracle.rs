//! Request boundary: one user action in, one rendered reading out.
//!
//! A market reading is fetch → encode → lookup. A divination is cast → lookup.
//! Each call is independent; failures come back as [`HexError`] for the
//! caller to display.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{BarProvider, DataSource, FetchWindow};
use crate::divination::{cast, Casting};
use crate::domain::HexagramKey;
use crate::encoder::{encode, Encoding};
use crate::error::HexError;
use crate::knowledge::{HexagramRecord, KnowledgeBase};

/// A key resolved against the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hexagram {
    pub key: HexagramKey,
    #[serde(flatten)]
    pub record: HexagramRecord,
}

impl Hexagram {
    pub fn resolve(kb: &KnowledgeBase, key: HexagramKey) -> Result<Self, HexError> {
        let record = kb.lookup(key)?.clone();
        Ok(Self { key, record })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReading {
    pub symbol: String,
    pub reference_date: NaiveDate,
    pub window: FetchWindow,
    pub source: DataSource,
    /// Bars the provider returned for the window.
    pub bars_available: usize,
    pub encoding: Encoding,
    pub present: Hexagram,
    pub projected: Hexagram,
}

impl MarketReading {
    pub fn has_changes(&self) -> bool {
        self.encoding.has_changes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divination {
    pub question: String,
    pub casting: Casting,
    pub present: Hexagram,
    pub projected: Hexagram,
}

impl Divination {
    pub fn has_changes(&self) -> bool {
        self.casting.has_changes()
    }
}

/// Fetch bars for `symbol` ending at `reference_date`, encode the latest six,
/// and resolve both hexagrams.
pub fn read_market(
    provider: &dyn BarProvider,
    kb: &KnowledgeBase,
    symbol: &str,
    reference_date: NaiveDate,
    lookback_days: u32,
) -> Result<MarketReading, HexError> {
    let window = FetchWindow::ending_at(reference_date, lookback_days);
    tracing::info!(
        %symbol,
        provider = provider.name(),
        start = %window.start,
        end = %window.end,
        "market reading requested"
    );

    let fetched = provider.fetch(symbol, window.start, window.end).map_err(|e| {
        tracing::warn!(%symbol, "fetch failed: {e}");
        HexError::from(e)
    })?;

    let encoding = encode(&fetched.bars).map_err(|e| {
        tracing::warn!(%symbol, bars = fetched.bars.len(), "cannot encode: {e}");
        e
    })?;

    let present = Hexagram::resolve(kb, encoding.present)?;
    let projected = Hexagram::resolve(kb, encoding.projected)?;

    tracing::info!(
        %symbol,
        present = %present.key,
        projected = %projected.key,
        moving = encoding.moving_positions().len(),
        "market reading complete"
    );

    Ok(MarketReading {
        symbol: symbol.to_string(),
        reference_date,
        window,
        source: fetched.source,
        bars_available: fetched.bars.len(),
        encoding,
        present,
        projected,
    })
}

/// Cast six lines for a question and resolve both hexagrams.
///
/// A blank question is refused before any coin is tossed.
pub fn divine<R: Rng + ?Sized>(
    kb: &KnowledgeBase,
    question: &str,
    rng: &mut R,
) -> Result<Divination, HexError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(HexError::EmptyQuestion);
    }

    let casting = cast(rng);
    let present = Hexagram::resolve(kb, casting.present)?;
    let projected = Hexagram::resolve(kb, casting.projected)?;

    tracing::info!(
        present = %present.key,
        projected = %projected.key,
        "divination cast"
    );

    Ok(Divination {
        question: question.to_string(),
        casting,
        present,
        projected,
    })
}
