//! HealthManager export converter
//!
//! Converts weight and blood-pressure tables from HealthManager Pro exports
//! into InfluxDB line protocol.
//!
//! The library provides:
//! - Section extraction from semi-structured export text ([`section`])
//! - Record parsing of `;`-delimited tables ([`record`])
//! - Local wall-clock to epoch conversion ([`timestamp`])
//! - Line protocol encoding and output ([`encoder`], [`writer`])
//! - Export selection by embedded date and cleanup ([`discovery`])
//!
//! ```no_run
//! use health_influx::{ExportProcessor, ProcessorConfig};
//! use std::path::Path;
//!
//! # fn main() -> health_influx::Result<()> {
//! let processor = ExportProcessor::new(ProcessorConfig::default());
//! let stats = processor.process_file(
//!     Path::new("HealthManager Pro Export - 01.01.2019 - 19.03.2025.csv"),
//!     Path::new("influxdb-import.csv"),
//! )?;
//! println!("{} points written", stats.total_points());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod encoder;
pub mod error;
pub mod models;
pub mod processor;
pub mod record;
pub mod section;
pub mod timestamp;
pub mod writer;

pub use config::ProcessorConfig;
pub use error::{HealthError, MissingFieldError, Result, TimestampParseError};
pub use models::{Category, EmissionOrder, Point, ProcessingStats, RawLine, Record};
pub use processor::ExportProcessor;
