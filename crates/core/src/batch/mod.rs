//! Batch issuance.
//!
//! [`BatchRunner`] takes a roster through the per-row pipeline
//! (validate, number, render, send) over a single mail session, then writes
//! the issuance log.

mod config;
mod runner;
mod types;

pub use config::{BatchConfig, BatchSettings};
pub use runner::BatchRunner;
pub use types::{
    BatchError, BatchPhase, BatchReport, RowOutcome, RowResult, SequenceCounter, SkipReason,
};
