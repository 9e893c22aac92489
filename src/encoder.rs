//! Line protocol encoding of parsed records
//!
//! Every point has the shape
//!
//! ```text
//! <owner>,entity_id=<entity>,friendly_name=<name> <key>=<value>,... <epoch_seconds>
//! ```
//!
//! Values are copied verbatim from the export. German decimal commas are kept
//! as they are, because the importer on the other side expects exactly the
//! text the device exported.

use crate::error::MissingFieldError;
use crate::models::{Category, Point, Record};

/// Builds points for one owner tag
#[derive(Debug, Clone)]
pub struct PointEncoder {
    owner: String,
}

impl PointEncoder {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Map a record's fields to the category's output keys
    pub fn encode(
        &self,
        category: Category,
        record: &Record,
        timestamp: i64,
    ) -> Result<Point, MissingFieldError> {
        let fields = category
            .field_map()
            .iter()
            .map(|&(key, source)| {
                record
                    .get(source)
                    .map(|value| (key, value.to_string()))
                    .ok_or(MissingFieldError {
                        category,
                        field: source,
                        line: record.line,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Point {
            category,
            owner: self.owner.clone(),
            timestamp,
            fields,
        })
    }
}
