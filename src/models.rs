//! Core data structures for export conversion.
//!
//! Defines measurement categories, raw lines, parsed records, encoded points
//! and the per-run processing statistics.

use crate::constants::{
    BLOOD_PRESSURE_FIELD_MAP, BLOOD_PRESSURE_FIELDS, BLOOD_PRESSURE_MARKER, WEIGHT_FIELD_MAP,
    WEIGHT_FIELDS, WEIGHT_MARKER,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Measurement categories embedded in a HealthManager export
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Category {
    Weight,
    BloodPressure,
}

impl Category {
    /// Substring of the line that opens this category's section
    pub fn marker(&self) -> &'static str {
        match self {
            Category::Weight => WEIGHT_MARKER,
            Category::BloodPressure => BLOOD_PRESSURE_MARKER,
        }
    }

    /// Header fields every record of this category must expose
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Category::Weight => WEIGHT_FIELDS,
            Category::BloodPressure => BLOOD_PRESSURE_FIELDS,
        }
    }

    /// Output key and source field pairs, in emission order
    pub fn field_map(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Weight => WEIGHT_FIELD_MAP,
            Category::BloodPressure => BLOOD_PRESSURE_FIELD_MAP,
        }
    }

    pub fn entity_id(&self) -> &'static str {
        match self {
            Category::Weight => "weight",
            Category::BloodPressure => "blood_pressure",
        }
    }

    pub fn friendly_name(&self) -> &'static str {
        match self {
            Category::Weight => "Gewicht",
            Category::BloodPressure => "Blutdruck",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Weight => write!(f, "Weight"),
            Category::BloodPressure => write!(f, "BloodPressure"),
        }
    }
}

/// Order in which categories are written to the output
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum EmissionOrder {
    #[default]
    WeightFirst,
    BloodPressureFirst,
}

impl EmissionOrder {
    pub fn categories(&self) -> [Category; 2] {
        match self {
            EmissionOrder::WeightFirst => [Category::Weight, Category::BloodPressure],
            EmissionOrder::BloodPressureFirst => [Category::BloodPressure, Category::Weight],
        }
    }
}

/// One line of the export, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Split file content into numbered lines, dropping a leading BOM
    pub fn split_content(content: &str) -> Vec<RawLine> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        content
            .lines()
            .enumerate()
            .map(|(index, text)| RawLine::new(index + 1, text))
            .collect()
    }
}

/// One parsed data row: header field name to raw value, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Line number of the row in the export
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(line: usize, fields: Vec<(String, String)>) -> Self {
        Self { line, fields }
    }

    /// Raw value of a field; the last column wins when the header repeats a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }
}

/// One encoded measurement, ready for line protocol output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub category: Category,
    pub owner: String,
    pub timestamp: i64,
    pub fields: Vec<(&'static str, String)>,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},entity_id={},friendly_name={} ",
            self.owner,
            self.category.entity_id(),
            self.category.friendly_name()
        )?;
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, " {}", self.timestamp)
    }
}

/// A record that produced no point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub category: Category,
    pub line: usize,
    pub date: String,
    pub time: String,
    pub reason: String,
}

/// Conversion counters for one category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Whether a marker line for the category was seen
    pub section_found: bool,

    /// Lines collected into the section, header included
    pub lines_extracted: usize,

    pub records_parsed: usize,

    pub points_written: usize,

    pub skipped: Vec<SkippedRecord>,
}

impl CategoryStats {
    pub fn records_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Percentage of parsed records that became points
    pub fn success_rate(&self) -> f64 {
        if self.records_parsed == 0 {
            0.0
        } else {
            (self.points_written as f64 / self.records_parsed as f64) * 100.0
        }
    }
}

/// Processing statistics for one run
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Per-category counters in emission order
    pub categories: Vec<(Category, CategoryStats)>,
    pub files_removed: usize,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn category(&self, category: Category) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, stats)| stats)
    }

    pub fn total_points(&self) -> usize {
        self.categories.iter().map(|(_, s)| s.points_written).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(|(_, s)| s.records_skipped()).sum()
    }
}
