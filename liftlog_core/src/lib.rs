#![forbid(unsafe_code)]

//! Core domain model and analytics for the Liftlog workout report.
//!
//! This crate provides:
//! - Domain types (logged sets, best performances, day reports)
//! - Record parsing of the flat workout CSV
//! - The load-once session store
//! - Performance queries (best set per exercise, sets for a date, previous occurrence)
//! - Value formatting shared by presentation layers

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod parser;
pub mod store;
pub mod engine;
pub mod format;

// Re-export commonly used types
pub use error::{Error, Result, RowParseError};
pub use types::*;
pub use config::Config;
pub use parser::{parse_log, parse_str, DateOrder, ParseOptions, ParsedLog, SkippedRow};
pub use store::{LoadReport, SessionStore, SourceStatus};
pub use engine::{
    best_performances, day_report, epley, estimate_one_rep_max, most_recent_prior,
    sessions_on_date, training_dates, workout_header,
};
