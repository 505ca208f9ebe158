#![forbid(unsafe_code)]

//! Core domain model and calculation engine for Titra.
//!
//! This crate provides:
//! - Domain types (titration input, result, history record)
//! - Unit normalization
//! - The titration calculation engine
//! - Input validation and result warnings
//! - Result presentation
//! - History storage and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod calculator;
pub mod validate;
pub mod report;
pub mod history;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use units::to_liters;
pub use calculator::compute;
pub use validate::{warnings, Warning};
pub use history::{HistoryStore, JsonlHistory, MemoryHistory};
pub use export::export_csv;
