//! Configuration management and validation.
//!
//! Holds the settings of one conversion run: where exports are looked up,
//! which categories are converted in which order, and where points go.

use crate::constants::{DEFAULT_FILE_PATTERN, DEFAULT_OUTPUT_FILE, DEFAULT_OWNER_TAG};
use crate::error::{HealthError, Result};
use crate::models::{Category, EmissionOrder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Tag prefixed to every point
    pub owner_tag: String,

    /// Order in which category blocks are written
    pub emission_order: EmissionOrder,

    /// Categories to convert
    pub categories: Vec<Category>,

    /// Directory searched for exports
    pub input_dir: PathBuf,

    /// Glob pattern for export file names inside `input_dir`
    pub file_pattern: String,

    /// Explicit export file, bypasses selection by date
    pub input_file: Option<PathBuf>,

    /// Line protocol output file
    pub output_path: PathBuf,

    /// Append to the output instead of replacing it
    pub append: bool,

    /// Remove matched exports after a successful run
    pub delete_processed: bool,

    /// Run the pipeline without writing output or removing files
    pub dry_run: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            owner_tag: DEFAULT_OWNER_TAG.to_string(),
            emission_order: EmissionOrder::default(),
            categories: vec![Category::Weight, Category::BloodPressure],
            input_dir: default_input_dir(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            input_file: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            append: false,
            delete_processed: false,
            dry_run: false,
        }
    }
}

/// Exports are usually saved to the download folder
fn default_input_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl ProcessorConfig {
    pub fn with_owner_tag(mut self, owner_tag: impl Into<String>) -> Self {
        self.owner_tag = owner_tag.into();
        self
    }

    pub fn with_emission_order(mut self, order: EmissionOrder) -> Self {
        self.emission_order = order;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_input_file(mut self, input_file: impl Into<PathBuf>) -> Self {
        self.input_file = Some(input_file.into());
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_append(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn with_delete_processed(mut self) -> Self {
        self.delete_processed = true;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Categories to convert, in emission order
    pub fn ordered_categories(&self) -> Vec<Category> {
        self.emission_order
            .categories()
            .into_iter()
            .filter(|c| self.categories.contains(c))
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.owner_tag.is_empty() {
            return Err(HealthError::configuration("owner tag must not be empty"));
        }
        if let Some(c) = self
            .owner_tag
            .chars()
            .find(|c| c.is_whitespace() || *c == ',' || *c == '=')
        {
            return Err(HealthError::configuration(format!(
                "owner tag '{}' contains '{}', which would break the point format",
                self.owner_tag, c
            )));
        }
        if self.categories.is_empty() {
            return Err(HealthError::configuration(
                "at least one category must be selected",
            ));
        }
        if self.input_file.is_none() && self.file_pattern.trim().is_empty() {
            return Err(HealthError::configuration("file pattern must not be empty"));
        }
        if self.file_pattern.contains('/') || self.file_pattern.contains('\\') {
            return Err(HealthError::configuration(format!(
                "file pattern '{}' must be a file name pattern, use --input-dir for the directory",
                self.file_pattern
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(HealthError::configuration("output path must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.owner_tag, "andreas");
        assert_eq!(config.emission_order, EmissionOrder::WeightFirst);
        assert_eq!(config.output_path, PathBuf::from("influxdb-import.csv"));
        assert!(!config.append);
        assert!(!config.delete_processed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ordered_categories() {
        let config = ProcessorConfig::default()
            .with_emission_order(EmissionOrder::BloodPressureFirst);
        assert_eq!(
            config.ordered_categories(),
            vec![Category::BloodPressure, Category::Weight]
        );

        let config = config.with_categories(vec![Category::Weight]);
        assert_eq!(config.ordered_categories(), vec![Category::Weight]);
    }

    #[test]
    fn test_owner_tag_validation() {
        for bad in ["", "an dreas", "a,b", "a=b"] {
            let config = ProcessorConfig::default().with_owner_tag(bad);
            assert!(config.validate().is_err(), "'{}' should be rejected", bad);
        }
        assert!(
            ProcessorConfig::default()
                .with_owner_tag("maria")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_other_validation_rules() {
        assert!(
            ProcessorConfig::default()
                .with_categories(vec![])
                .validate()
                .is_err()
        );
        assert!(
            ProcessorConfig::default()
                .with_file_pattern("exports/*.csv")
                .validate()
                .is_err()
        );
        assert!(
            ProcessorConfig::default()
                .with_output_path("")
                .validate()
                .is_err()
        );
    }
}
