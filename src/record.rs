//! Record parsing for extracted sections
//!
//! The first line of a section is the header; every following line becomes
//! one [`Record`] mapping header names to raw values. Short rows are padded
//! with empty values and surplus columns are dropped, so row length never
//! causes an error on its own.

use crate::constants::{DATE_FIELD, FIELD_DELIMITER, TIME_FIELD};
use crate::error::{HealthError, MissingFieldError, Result};
use crate::models::{Category, Record};
use crate::section::Section;
use tracing::debug;

/// Parse a section's data lines into records, in line order
pub fn parse_records(section: &Section) -> Result<Vec<Record>> {
    if section.lines.is_empty() {
        return Ok(Vec::new());
    }

    let content = section
        .lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| HealthError::Csv {
            category: section.category,
            source,
        })?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|source| HealthError::Csv {
            category: section.category,
            source,
        })?;

        let line = source_line(section, row.position().map(|p| p.line() as usize), index);

        if row.len() > headers.len() {
            debug!(
                "{} line {}: ignoring {} columns beyond the header",
                section.category,
                line,
                row.len() - headers.len()
            );
        }

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), row.get(i).unwrap_or("").to_string()))
            .collect();

        records.push(Record::new(line, fields));
    }

    debug!(
        "{}: parsed {} records with {} header fields",
        section.category,
        records.len(),
        headers.len()
    );

    Ok(records)
}

/// Map a reader position back to the export's line number
fn source_line(section: &Section, reader_line: Option<usize>, index: usize) -> usize {
    reader_line
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| section.lines.get(i))
        .or_else(|| section.data_lines().get(index))
        .map(|line| line.number)
        .unwrap_or(0)
}

/// Reject a section whose rows cannot be timestamped at all
///
/// A section with data rows needs a header naming both `Datum` and `Uhrzeit`.
/// Sections without data rows always pass.
pub fn validate_header(section: &Section) -> Result<()> {
    let Some(header) = section.header() else {
        return Ok(());
    };
    if section.data_lines().is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = header
        .text
        .split(FIELD_DELIMITER as char)
        .map(str::trim)
        .collect();
    let missing: Vec<&str> = [DATE_FIELD, TIME_FIELD]
        .into_iter()
        .filter(|field| !names.contains(field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(HealthError::MissingHeader {
            category: section.category,
            line: header.number,
            missing: missing.join(", "),
        })
    }
}

/// Check that a record exposes every field its category declares
pub fn require_fields(
    record: &Record,
    category: Category,
) -> std::result::Result<(), MissingFieldError> {
    match category.fields().iter().find(|f| !record.has_field(f)) {
        Some(field) => Err(MissingFieldError {
            category,
            field: *field,
            line: record.line,
        }),
        None => Ok(()),
    }
}
