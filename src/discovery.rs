//! Export file discovery and cleanup
//!
//! HealthManager names its exports after the covered period, e.g.
//! `HealthManager Pro Export - 01.01.2019 - 19.03.2025.csv`. Several exports
//! tend to pile up in the download folder; the newest one is picked by the
//! latest date embedded in its name. After a successful run every matched
//! export can be removed.

use crate::constants::{FILENAME_DATE_FORMAT, FILENAME_DATE_REGEX};
use crate::error::{HealthError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Finds exports matching a file name pattern inside one directory
#[derive(Debug)]
pub struct ExportSelector {
    dir: PathBuf,
    pattern: String,
    date_regex: Regex,
}

impl ExportSelector {
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Result<Self> {
        let date_regex = Regex::new(FILENAME_DATE_REGEX).map_err(|e| {
            HealthError::configuration(format!("invalid file date expression: {}", e))
        })?;
        Ok(Self {
            dir: dir.into(),
            pattern: pattern.into(),
            date_regex,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// All regular files in the directory matching the pattern, sorted by name
    pub fn candidates(&self) -> Result<Vec<PathBuf>> {
        let escaped_dir = glob::Pattern::escape(&self.dir.to_string_lossy());
        let full_pattern = Path::new(&escaped_dir).join(&self.pattern);
        let full_pattern = full_pattern.to_string_lossy();

        debug!("Searching for exports with pattern: {}", full_pattern);

        let entries = glob::glob(&full_pattern).map_err(|source| HealthError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| HealthError::Io(e.into_error()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} matching files", files.len());
        Ok(files)
    }

    /// Latest `dd.mm.yyyy` date in the file name
    pub fn embedded_date(&self, path: &Path) -> Option<NaiveDate> {
        let name = path.file_name()?.to_string_lossy();
        self.date_regex
            .captures_iter(&name)
            .filter_map(|caps| NaiveDate::parse_from_str(&caps[1], FILENAME_DATE_FORMAT).ok())
            .max()
    }

    /// The matching export with the most recent embedded date
    pub fn select_latest(&self) -> Result<PathBuf> {
        let mut latest: Option<(NaiveDate, PathBuf)> = None;

        for path in self.candidates()? {
            let Some(date) = self.embedded_date(&path) else {
                debug!("Ignoring {}: no date in file name", path.display());
                continue;
            };
            // Candidates are sorted, so on equal dates the later name wins
            if latest.as_ref().is_none_or(|(best, _)| date >= *best) {
                latest = Some((date, path));
            }
        }

        match latest {
            Some((date, path)) => {
                info!("Selected export {} (dated {})", path.display(), date);
                Ok(path)
            }
            None => Err(HealthError::NoInputFiles {
                dir: self.dir.clone(),
                pattern: self.pattern.clone(),
            }),
        }
    }

    /// Remove every matching export, returning the removed paths
    pub fn cleanup(&self) -> Result<Vec<PathBuf>> {
        let files = self.candidates()?;
        let matched = files.len();
        let mut removed = Vec::with_capacity(matched);
        let mut failed = 0;

        for path in files {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed {}", path.display());
                    removed.push(path);
                }
                Err(e) => {
                    warn!("Failed to remove {}: {}", path.display(), e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(HealthError::Cleanup { matched, failed });
        }

        info!("Removed {} processed exports", removed.len());
        Ok(removed)
    }
}
