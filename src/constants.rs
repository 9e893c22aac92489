//! Application constants for the HealthManager export converter
//!
//! Markers, field names and output keys of the two measurement sections,
//! plus defaults for file selection and output.

// =============================================================================
// Export Layout
// =============================================================================

/// Field delimiter used by the embedded tables
pub const FIELD_DELIMITER: u8 = b';';

/// Same delimiter as a char, for splitting raw lines
pub const FIELD_DELIMITER_CHAR: char = ';';

/// Section marker of the body-composition table
pub const WEIGHT_MARKER: &str = "Gewicht";

/// Section marker of the blood-pressure table
pub const BLOOD_PRESSURE_MARKER: &str = "Blutdruck";

/// Substring identifying the weight table's header row
pub const WEIGHT_HEADER_MARKER: &str = "Körperfett";

/// Zero-based index of the weight column that must be populated on data rows
pub const WEIGHT_REQUIRED_COLUMN: usize = 4;

/// Substrings identifying summary rows inside the blood-pressure table
pub const BLOOD_PRESSURE_AGGREGATE_MARKERS: &[&str] = &["MAD =", "Ø ="];

// =============================================================================
// Record Fields
// =============================================================================

/// Date column shared by both tables
pub const DATE_FIELD: &str = "Datum";

/// Time column shared by both tables
pub const TIME_FIELD: &str = "Uhrzeit";

/// Weight table fields
pub const WEIGHT_FIELDS: &[&str] = &[
    "Datum",
    "Uhrzeit",
    "kg",
    "BMI",
    "Körperfett",
    "Wasser",
    "Muskeln",
    "Knochen",
];

/// Blood-pressure table fields
pub const BLOOD_PRESSURE_FIELDS: &[&str] = &["Datum", "Uhrzeit", "Sys", "Dia", "Puls", "MAD"];

/// Output key and source field, in emission order
pub const WEIGHT_FIELD_MAP: &[(&str, &str)] = &[
    ("weight", "kg"),
    ("BMI", "BMI"),
    ("fat", "Körperfett"),
    ("water", "Wasser"),
    ("muscles", "Muskeln"),
    ("bones", "Knochen"),
];

/// Output key and source field, in emission order
pub const BLOOD_PRESSURE_FIELD_MAP: &[(&str, &str)] = &[
    ("sys", "Sys"),
    ("dia", "Dia"),
    ("pulse", "Puls"),
    ("MAD", "MAD"),
];

// =============================================================================
// Timestamps
// =============================================================================

/// `Datum` + ' ' + `Uhrzeit`
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Date format embedded in export file names
pub const FILENAME_DATE_FORMAT: &str = "%d.%m.%Y";

/// Matches `dd.mm.yyyy` inside a file name
pub const FILENAME_DATE_REGEX: &str = r"\b(\d{2}\.\d{2}\.\d{4})\b";

// =============================================================================
// Defaults
// =============================================================================

/// Owner tag prefixed to every point
pub const DEFAULT_OWNER_TAG: &str = "andreas";

/// Glob pattern for export files inside the input directory
pub const DEFAULT_FILE_PATTERN: &str = "HealthManager Pro Export*.csv";

/// Output file written next to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "influxdb-import.csv";

/// Tracing target used by the default log filter
pub const LOG_TARGET: &str = "health_influx";
