//! Error handling for export conversion.
//!
//! Structural failures abort the run. Per-record failures
//! ([`TimestampParseError`], [`MissingFieldError`]) are standalone types so the
//! processor can branch on them and keep going with the next record.

use crate::models::Category;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found or unreadable: {path} - {reason}")]
    InputNotFound { path: PathBuf, reason: String },

    #[error("No export files matching '{pattern}' in {dir}")]
    NoInputFiles { dir: PathBuf, pattern: String },

    #[error("{category} section at line {line} has data rows but no header with {missing}")]
    MissingHeader {
        category: Category,
        line: usize,
        missing: String,
    },

    #[error(transparent)]
    TimestampParse(#[from] TimestampParseError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("CSV error in {category} section: {source}")]
    Csv {
        category: Category,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to remove {failed} of {matched} processed export files")]
    Cleanup { matched: usize, failed: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl HealthError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors that only invalidate a single record
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TimestampParse(_) | Self::MissingField(_))
    }
}

/// A `Datum`/`Uhrzeit` pair that does not form a valid `dd.mm.yyyy HH:MM` wall-clock time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot convert date and time '{date} {time}': {reason}")]
pub struct TimestampParseError {
    pub date: String,
    pub time: String,
    pub reason: String,
}

/// A record whose header did not declare one of its category's fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{category} record at line {line} has no '{field}' field")]
pub struct MissingFieldError {
    pub category: Category,
    pub field: &'static str,
    pub line: usize,
}

pub type Result<T> = std::result::Result<T, HealthError>;
