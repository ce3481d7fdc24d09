//! Row transforms
//!
//! A transform turns a filtered source row into a persistence-ready row.
//! Only table-specific concerns live here; truncation, reading and
//! inserting belong to the import engine.

pub mod lists;
pub mod secrets;
pub mod timestamps;

pub use lists::{decode_list, ListEncoding};
pub use secrets::{hash_secret, verify_secret};
pub use timestamps::{now_stamp, TimestampPolicy, TIMESTAMP_FORMAT};

use crate::errors::TransformError;
use crate::model::{CellValue, Row};
use ipagency_core_types::Sensitive;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";
pub const CREATED_BY: &str = "created_by";
pub const UPDATED_BY: &str = "updated_by";

/// Table-specific row transformation
pub trait RowTransform {
    fn transform(&self, row: Row) -> Result<Row, TransformError>;

    /// Columns whose raw values must never be logged or reported
    fn secret_columns(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<F> RowTransform for F
where
    F: Fn(Row) -> Result<Row, TransformError>,
{
    fn transform(&self, row: Row) -> Result<Row, TransformError> {
        self(row)
    }
}

/// The transform shared by every spreadsheet-backed table
///
/// Applied in order: timestamps, list decoding, secret hashing.
/// Values already present in the row always win over stamped defaults.
/// Actor columns depend on the destination schema and are stamped by the
/// import engine.
#[derive(Debug, Clone)]
pub struct StandardTransform {
    timestamps: TimestampPolicy,
    list_columns: Vec<(String, ListEncoding)>,
    secret_columns: Vec<String>,
}

impl StandardTransform {
    pub fn new(timestamps: TimestampPolicy) -> Self {
        Self {
            timestamps,
            list_columns: Vec::new(),
            secret_columns: Vec::new(),
        }
    }

    pub fn with_list_column(mut self, column: impl Into<String>, encoding: ListEncoding) -> Self {
        self.list_columns.push((column.into(), encoding));
        self
    }

    pub fn with_secret_column(mut self, column: impl Into<String>) -> Self {
        self.secret_columns.push(column.into());
        self
    }

    pub fn timestamps(&self) -> &TimestampPolicy {
        &self.timestamps
    }

    fn stamp_timestamps(&self, row: &mut Row) {
        if row.contains(CREATED_AT) && row.contains(UPDATED_AT) {
            return;
        }
        let stamp = self.timestamps.resolve();
        row.insert_if_absent(CREATED_AT, stamp.clone());
        row.insert_if_absent(UPDATED_AT, stamp);
    }

    fn decode_lists(&self, row: &mut Row) {
        for (column, encoding) in &self.list_columns {
            if let Some(value) = row.get(column) {
                let decoded = decode_list(value, *encoding);
                row.insert(column.clone(), decoded);
            }
        }
    }

    fn hash_secrets(&self, row: &mut Row) -> Result<(), TransformError> {
        for column in &self.secret_columns {
            let Some(value) = row.get(column) else {
                continue;
            };
            let plain = value.as_text().ok_or_else(|| TransformError::InvalidValue {
                column: column.clone(),
                reason: "secret must be a scalar value".to_string(),
            })?;
            let hashed = hash_secret(&Sensitive::new(plain)).map_err(|e| TransformError::Hash {
                column: column.clone(),
                message: e.to_string(),
            })?;
            row.insert(column.clone(), CellValue::Text(hashed));
        }
        Ok(())
    }
}

impl RowTransform for StandardTransform {
    fn transform(&self, mut row: Row) -> Result<Row, TransformError> {
        self.stamp_timestamps(&mut row);
        self.decode_lists(&mut row);
        self.hash_secrets(&mut row)?;
        Ok(row)
    }

    fn secret_columns(&self) -> Vec<&str> {
        self.secret_columns.iter().map(String::as_str).collect()
    }
}
