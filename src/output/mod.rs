//! Output module for persisting records and reporting on a run
//!
//! This module handles:
//! - Appending product records to the CSV output file
//! - Collecting and printing run statistics

mod csv_sink;
pub mod report;

pub use csv_sink::append_records;
pub use report::{print_report, FailedFetch, FetchStage, RunReport};
