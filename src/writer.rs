//! Output sink for encoded points
//!
//! Points are written one per line through a [`BufWriter`]. Call
//! [`PointWriter::finish`] to flush and surface write errors; a writer that is
//! dropped early (a structural error further down the run) still flushes what
//! it buffered.

use crate::error::{HealthError, Result};
use crate::models::Point;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Line protocol writer
#[derive(Debug)]
pub struct PointWriter<W: Write> {
    inner: BufWriter<W>,
    points_written: usize,
}

impl PointWriter<File> {
    /// Open the output file, truncating it unless `append` is set
    pub fn create(path: &Path, append: bool) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        debug!(
            "Opened {} for {}",
            path.display(),
            if append { "appending" } else { "writing" }
        );
        Ok(Self::new(file))
    }
}

impl<W: Write> PointWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
            points_written: 0,
        }
    }

    pub fn write_point(&mut self, point: &Point) -> Result<()> {
        writeln!(self.inner, "{}", point)?;
        self.points_written += 1;
        Ok(())
    }

    pub fn points_written(&self) -> usize {
        self.points_written
    }

    /// Flush buffered lines and hand back the underlying sink
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| HealthError::Io(e.into_error()))
    }
}
