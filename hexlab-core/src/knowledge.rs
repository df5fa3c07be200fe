//! The 64-entry hexagram knowledge base.
//!
//! The table ships as a TOML asset compiled into the binary. It is parsed and
//! validated once, on first use, and is immutable afterwards. Lookups are by
//! exact key; a miss is an integrity failure, never a fallback.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::domain::HexagramKey;
use crate::error::HexError;

const EMBEDDED_TABLE: &str = include_str!("../assets/hexagrams.toml");

/// Directional reading attached to each hexagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outlook::Bullish => "bullish",
            Outlook::Bearish => "bearish",
            Outlook::Neutral => "neutral",
        })
    }
}

/// Static interpretive text for one hexagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramRecord {
    pub name: String,
    pub pinyin: String,
    pub symbol: String,
    pub judgment: String,
    pub interpretation: String,
    pub outlook: Outlook,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    hexagram: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    key: String,
    #[serde(flatten)]
    record: HexagramRecord,
}

/// Immutable key → record table with full 64-key coverage.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    // Indexed by `HexagramKey::index()`.
    records: Vec<HexagramRecord>,
}

impl KnowledgeBase {
    /// The table compiled into the binary, parsed once per process.
    pub fn embedded() -> Result<&'static KnowledgeBase, HexError> {
        static EMBEDDED: OnceLock<Result<KnowledgeBase, HexError>> = OnceLock::new();
        EMBEDDED
            .get_or_init(|| {
                let kb = KnowledgeBase::from_toml(EMBEDDED_TABLE);
                if let Err(e) = &kb {
                    tracing::error!("embedded hexagram table rejected: {e}");
                }
                kb
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Parse and validate a table. Every key must parse, appear once, and
    /// together the keys must cover all 64 combinations.
    pub fn from_toml(text: &str) -> Result<Self, HexError> {
        let file: TableFile = toml::from_str(text)
            .map_err(|e| HexError::malformed_table(format!("table does not parse: {e}")))?;

        let mut slots: Vec<Option<HexagramRecord>> = vec![None; HexagramKey::COUNT];
        for entry in file.hexagram {
            let key: HexagramKey = entry
                .key
                .parse()
                .map_err(|e| HexError::malformed_table(format!("{e}")))?;
            let slot = &mut slots[key.index()];
            if slot.is_some() {
                return Err(HexError::Integrity {
                    key: Some(key),
                    detail: format!("duplicate entry for key {key}"),
                });
            }
            *slot = Some(entry.record);
        }

        let mut records = Vec::with_capacity(HexagramKey::COUNT);
        for (key, slot) in HexagramKey::all().zip(slots) {
            match slot {
                Some(record) => records.push(record),
                None => return Err(HexError::missing_key(key)),
            }
        }
        Ok(Self { records })
    }

    /// Exact-key lookup.
    pub fn lookup(&self, key: HexagramKey) -> Result<&HexagramRecord, HexError> {
        self.records.get(key.index()).ok_or_else(|| {
            tracing::error!(%key, "hexagram key missing from knowledge base");
            HexError::missing_key(key)
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All entries in key-index order.
    pub fn iter(&self) -> impl Iterator<Item = (HexagramKey, &HexagramRecord)> {
        HexagramKey::all().zip(self.records.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, name: &str) -> String {
        format!(
            "[[hexagram]]\nkey = \"{key}\"\nname = \"{name}\"\npinyin = \"p\"\nsymbol = \"s\"\n\
             judgment = \"j\"\ninterpretation = \"i\"\noutlook = \"neutral\"\n\n"
        )
    }

    fn full_table() -> String {
        HexagramKey::all()
            .map(|k| entry(&k.to_string(), &format!("h{}", k.index())))
            .collect()
    }

    #[test]
    fn embedded_table_is_complete() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert_eq!(kb.len(), 64);
        for key in HexagramKey::all() {
            assert!(kb.lookup(key).is_ok(), "missing {key}");
        }
    }

    #[test]
    fn embedded_table_spot_checks() {
        let kb = KnowledgeBase::embedded().unwrap();
        let qian = kb.lookup("1,1,1,1,1,1".parse().unwrap()).unwrap();
        assert_eq!(qian.name, "乾");
        assert_eq!(qian.outlook, Outlook::Bullish);
        let kun = kb.lookup("0,0,0,0,0,0".parse().unwrap()).unwrap();
        assert_eq!(kun.name, "坤");
        assert_eq!(kun.outlook, Outlook::Bearish);
        let zhun = kb.lookup("1,0,0,0,1,0".parse().unwrap()).unwrap();
        assert_eq!(zhun.symbol, "䷂");
    }

    #[test]
    fn cui_sits_under_kun_below_dui_above() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert_eq!(kb.lookup("0,0,0,1,1,0".parse().unwrap()).unwrap().name, "萃");
        assert_eq!(kb.lookup("0,0,0,0,1,1".parse().unwrap()).unwrap().name, "观");
    }

    #[test]
    fn lookup_is_idempotent() {
        let kb = KnowledgeBase::embedded().unwrap();
        let key: HexagramKey = "0,1,0,1,0,1".parse().unwrap();
        let first = kb.lookup(key).unwrap().clone();
        let second = kb.lookup(key).unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn accepts_synthetic_full_table() {
        let kb = KnowledgeBase::from_toml(&full_table()).unwrap();
        assert_eq!(kb.iter().count(), 64);
        let (key, rec) = kb.iter().nth(5).unwrap();
        assert_eq!(key.index(), 5);
        assert_eq!(rec.name, "h5");
    }

    #[test]
    fn rejects_gap() {
        let text: String = HexagramKey::all()
            .filter(|k| k.index() != 17)
            .map(|k| entry(&k.to_string(), "x"))
            .collect();
        let err = KnowledgeBase::from_toml(&text).unwrap_err();
        match err {
            HexError::Integrity { key: Some(key), .. } => assert_eq!(key.index(), 17),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate() {
        let mut text = full_table();
        text.push_str(&entry("0,0,0,0,1,1", "dup"));
        let err = KnowledgeBase::from_toml(&text).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_malformed_key() {
        let mut text = full_table();
        text.push_str(&entry("1,1,1", "short"));
        assert!(KnowledgeBase::from_toml(&text).unwrap_err().is_integrity());
    }
}
