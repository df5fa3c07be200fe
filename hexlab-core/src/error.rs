//! Top-level error type for readings and castings.
//!
//! Every variant renders a message fit for a status bar or stderr.

use thiserror::Error;

use crate::data::DataError;
use crate::domain::{BarError, HexagramKey};

#[derive(Debug, Clone, Error)]
pub enum HexError {
    /// Fewer bars than a hexagram needs. Raised before any key lookup.
    #[error("insufficient data: need at least {required} trading days, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// A computed key has no knowledge-base entry, or the table itself is malformed.
    #[error("knowledge base integrity error: {detail}")]
    Integrity {
        key: Option<HexagramKey>,
        detail: String,
    },

    #[error("a question is required before casting")]
    EmptyQuestion,

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    InvalidBar(#[from] BarError),
}

impl HexError {
    /// Integrity failure for a key that was computed but is missing from the table.
    pub fn missing_key(key: HexagramKey) -> Self {
        HexError::Integrity {
            key: Some(key),
            detail: format!("no entry for key {key}"),
        }
    }

    /// Integrity failure in the table itself (parse error, duplicate, gap).
    pub fn malformed_table(detail: impl Into<String>) -> Self {
        HexError::Integrity {
            key: None,
            detail: detail.into(),
        }
    }

    /// True for errors that point at a defect rather than bad input.
    pub fn is_integrity(&self) -> bool {
        matches!(self, HexError::Integrity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_counts() {
        let err = HexError::InsufficientData {
            required: 6,
            available: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn missing_key_is_integrity() {
        let key: HexagramKey = "1,0,0,0,1,0".parse().unwrap();
        let err = HexError::missing_key(key);
        assert!(err.is_integrity());
        assert!(err.to_string().contains("1,0,0,0,1,0"));
    }

    #[test]
    fn data_errors_pass_through_transparently() {
        let err: HexError = DataError::SymbolNotFound {
            symbol: "XX=F".into(),
        }
        .into();
        assert_eq!(err.to_string(), "symbol not found: XX=F");
        assert!(!err.is_integrity());
    }
}
