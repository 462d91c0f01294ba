//! Data layer for the fleet maintenance report.
//!
//! Reads spreadsheet or CSV sources, normalizes headers, coerces rows into
//! typed records, and answers filtered aggregate queries over them.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod normalizer;
pub mod reader;

pub use fleet_core as core;
