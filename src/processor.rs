//! Main conversion engine.
//!
//! Drives the pipeline for every selected category in emission order:
//! section extraction, record parsing, timestamp normalization and point
//! encoding. Records that cannot be converted are logged and counted, never
//! fatal. A structural problem with a section stops the run before any point
//! of that category is written.

use crate::config::ProcessorConfig;
use crate::constants::{DATE_FIELD, TIME_FIELD};
use crate::encoder::PointEncoder;
use crate::error::{HealthError, Result};
use crate::models::{Category, CategoryStats, Point, ProcessingStats, RawLine, Record, SkippedRecord};
use crate::record::{parse_records, require_fields, validate_header};
use crate::section::extract_section;
use crate::timestamp::normalize_in;
use crate::writer::PointWriter;

use chrono::{Local, TimeZone};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converts export lines into line protocol points
#[derive(Debug)]
pub struct ExportProcessor<Tz: TimeZone = Local> {
    config: ProcessorConfig,
    encoder: PointEncoder,
    zone: Tz,
}

impl ExportProcessor<Local> {
    /// Create a processor that reads wall-clock times in the local zone
    pub fn new(config: ProcessorConfig) -> Self {
        let encoder = PointEncoder::new(config.owner_tag.clone());
        Self {
            config,
            encoder,
            zone: Local,
        }
    }
}

impl<Tz: TimeZone> ExportProcessor<Tz> {
    /// Read wall-clock times in another zone
    pub fn with_zone<Z: TimeZone>(self, zone: Z) -> ExportProcessor<Z> {
        ExportProcessor {
            config: self.config,
            encoder: self.encoder,
            zone,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Convert one export file and write its points to `output`
    ///
    /// Nothing is written when the configuration asks for a dry run.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        info!("Reading export {}", input.display());

        let content =
            std::fs::read_to_string(input).map_err(|e| HealthError::InputNotFound {
                path: input.to_path_buf(),
                reason: e.to_string(),
            })?;
        let lines = RawLine::split_content(&content);
        debug!("Export has {} lines", lines.len());

        let categories = if self.config.dry_run {
            info!("Dry run, no output is written");
            let mut writer = PointWriter::new(std::io::sink());
            let categories = self.process_lines(&lines, &mut writer)?;
            writer.finish()?;
            categories
        } else {
            let mut writer = PointWriter::create(output, self.config.append)?;
            let categories = self.process_lines(&lines, &mut writer)?;
            writer.finish()?;
            categories
        };

        Ok(ProcessingStats {
            input_path: Some(input.to_path_buf()),
            output_path: (!self.config.dry_run).then(|| output.to_path_buf()),
            categories,
            files_removed: 0,
            processing_time_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Run every selected category over in-memory lines
    pub fn process_lines<W: Write>(
        &self,
        lines: &[RawLine],
        writer: &mut PointWriter<W>,
    ) -> Result<Vec<(Category, CategoryStats)>> {
        let mut results = Vec::new();

        for category in self.config.ordered_categories() {
            let (points, stats) = self.convert_category(lines, category)?;
            for point in &points {
                writer.write_point(point)?;
            }
            info!(
                "{}: {} points written, {} records skipped",
                category,
                points.len(),
                stats.records_skipped()
            );
            results.push((category, stats));
        }

        debug!("{} points written in total", writer.points_written());
        Ok(results)
    }

    /// Convert one category without writing anything
    pub fn convert_category(
        &self,
        lines: &[RawLine],
        category: Category,
    ) -> Result<(Vec<Point>, CategoryStats)> {
        let section = extract_section(lines, category);
        let mut stats = CategoryStats {
            section_found: section.is_found(),
            lines_extracted: section.lines.len(),
            ..Default::default()
        };

        if !section.is_found() {
            info!("No {} section in export", category);
            return Ok((Vec::new(), stats));
        }

        validate_header(&section)?;
        let records = parse_records(&section)?;
        stats.records_parsed = records.len();

        let mut points = Vec::with_capacity(records.len());
        for record in &records {
            match self.convert_record(category, record) {
                Ok(point) => points.push(point),
                Err(error) => {
                    debug_assert!(error.is_recoverable(), "fatal error on record path: {}", error);
                    let skipped = SkippedRecord {
                        category,
                        line: record.line,
                        date: record.get(DATE_FIELD).unwrap_or_default().to_string(),
                        time: record.get(TIME_FIELD).unwrap_or_default().to_string(),
                        reason: error.to_string(),
                    };
                    warn!(
                        category = %category,
                        line = skipped.line,
                        date = %skipped.date,
                        time = %skipped.time,
                        "Skipping record: {}",
                        error
                    );
                    stats.skipped.push(skipped);
                }
            }
        }

        stats.points_written = points.len();
        Ok((points, stats))
    }

    /// Convert a single record; only recoverable errors come back
    pub fn convert_record(&self, category: Category, record: &Record) -> Result<Point> {
        require_fields(record, category)?;

        let date = record.get(DATE_FIELD).unwrap_or_default();
        let time = record.get(TIME_FIELD).unwrap_or_default();
        let timestamp = normalize_in(date, time, &self.zone)?;

        Ok(self.encoder.encode(category, record, timestamp)?)
    }
}
