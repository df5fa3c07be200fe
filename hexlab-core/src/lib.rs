//! Hexlab Core: price bars in, hexagrams out.
//!
//! This crate contains everything below the presentation layer:
//! - Domain types (price bars, line values, six-bit hexagram keys)
//! - The hexagram encoder (six bars → present/projected keys)
//! - Coin-toss divination (three coins per line, injected RNG)
//! - The embedded 64-entry knowledge base
//! - Market-data providers (Yahoo Finance, CSV import)
//! - The request boundary that ties fetch, encode, and lookup together

pub mod config;
pub mod data;
pub mod divination;
pub mod domain;
pub mod encoder;
pub mod error;
pub mod instruments;
pub mod knowledge;
pub mod oracle;
pub mod rng;

pub use error::HexError;
