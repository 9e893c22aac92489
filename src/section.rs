//! Section extraction from HealthManager exports.
//!
//! An export is free text with `;`-delimited tables under headings such as
//! `Gewicht` or `Blutdruck`. Each category is located with a small state
//! machine:
//!
//! ```text
//! Searching --marker line--> Collecting --terminator--> Done
//! ```
//!
//! While collecting, every line is either included, skipped or terminates
//! the section. The transitions are driven by the pure predicates
//! [`is_marker`], [`terminates`] and [`includes`].
//!
//! Only the first marker opens a section. A second marker line met while
//! collecting is treated as an ordinary line and run through the same
//! predicates. This mirrors how existing exports have always been read and is
//! a known fragility: a heading without a blank line before it can leak into
//! the previous table.

use crate::constants::{
    BLOOD_PRESSURE_AGGREGATE_MARKERS, FIELD_DELIMITER_CHAR, WEIGHT_HEADER_MARKER,
    WEIGHT_REQUIRED_COLUMN,
};
use crate::models::{Category, RawLine};
use tracing::{debug, trace};

/// Scanning state for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorState {
    Searching,
    Collecting,
    Done,
}

/// What happened to a line fed into the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// Outside of the section
    Ignored,
    /// Marker line, section opened
    Opened,
    Included,
    /// Inside the section but filtered out
    Skipped,
    /// Section closed by this line
    Terminated,
}

/// Lines collected for one category, header first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    /// Line number of the marker, if one was found
    pub marker_line: Option<usize>,
    /// Trimmed lines with their original numbers
    pub lines: Vec<RawLine>,
}

impl Section {
    pub fn is_found(&self) -> bool {
        self.marker_line.is_some()
    }

    pub fn header(&self) -> Option<&RawLine> {
        self.lines.first()
    }

    pub fn data_lines(&self) -> &[RawLine] {
        self.lines.get(1..).unwrap_or(&[])
    }
}

/// State machine collecting one category's section line by line
#[derive(Debug)]
pub struct SectionExtractor {
    category: Category,
    state: ExtractorState,
    marker_line: Option<usize>,
    lines: Vec<RawLine>,
}

impl SectionExtractor {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            state: ExtractorState::Searching,
            marker_line: None,
            lines: Vec::new(),
        }
    }

    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Advance the state machine by one line
    pub fn feed(&mut self, line: &RawLine) -> LineAction {
        match self.state {
            ExtractorState::Searching => {
                if is_marker(self.category, &line.text) {
                    debug!(
                        "{} section opened by marker at line {}",
                        self.category, line.number
                    );
                    self.marker_line = Some(line.number);
                    self.state = ExtractorState::Collecting;
                    LineAction::Opened
                } else {
                    LineAction::Ignored
                }
            }
            ExtractorState::Collecting => {
                if terminates(self.category, &line.text) {
                    debug!(
                        "{} section closed at line {} after {} lines",
                        self.category,
                        line.number,
                        self.lines.len()
                    );
                    self.state = ExtractorState::Done;
                    LineAction::Terminated
                } else if includes(self.category, &line.text) {
                    self.lines
                        .push(RawLine::new(line.number, line.text.trim()));
                    LineAction::Included
                } else {
                    trace!("{} skipping line {}", self.category, line.number);
                    LineAction::Skipped
                }
            }
            ExtractorState::Done => LineAction::Ignored,
        }
    }

    pub fn finish(self) -> Section {
        Section {
            category: self.category,
            marker_line: self.marker_line,
            lines: self.lines,
        }
    }
}

/// Extract one category's section; later lines are not examined once it closes
pub fn extract_section(lines: &[RawLine], category: Category) -> Section {
    let mut extractor = SectionExtractor::new(category);
    for line in lines {
        extractor.feed(line);
        if extractor.state() == ExtractorState::Done {
            break;
        }
    }
    extractor.finish()
}

/// True when the line opens the category's section
pub fn is_marker(category: Category, line: &str) -> bool {
    line.contains(category.marker())
}

/// True when the line closes the category's section
pub fn terminates(category: Category, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    match category {
        Category::Weight => false,
        Category::BloodPressure => field(line, 0).is_empty(),
    }
}

/// True when a line inside the section belongs to the table
pub fn includes(category: Category, line: &str) -> bool {
    match category {
        Category::Weight => {
            line.contains(WEIGHT_HEADER_MARKER)
                || (!line.trim().is_empty() && !field(line, WEIGHT_REQUIRED_COLUMN).is_empty())
        }
        Category::BloodPressure => !BLOOD_PRESSURE_AGGREGATE_MARKERS
            .iter()
            .any(|marker| line.contains(marker)),
    }
}

/// Trimmed n-th delimited field, empty when the line is shorter
fn field(line: &str, index: usize) -> &str {
    line.split(FIELD_DELIMITER_CHAR)
        .nth(index)
        .map(str::trim)
        .unwrap_or("")
}
