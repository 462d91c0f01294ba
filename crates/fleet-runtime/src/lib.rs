//! Runtime layer for the fleet maintenance report.
//!
//! Holds the process-wide dataset and builds the overview and
//! per-category views over it.

pub mod store;
pub mod views;

pub use fleet_core as core;
pub use fleet_data as data;
