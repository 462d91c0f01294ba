//! Core types for the fleet maintenance report.
//!
//! Record model, category and schema definitions, cell coercion,
//! currency formatting, errors and command-line settings shared by the
//! data, runtime and binary crates.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod schema;
pub mod settings;
pub mod time_utils;

pub use error::{ReportError, Result};
