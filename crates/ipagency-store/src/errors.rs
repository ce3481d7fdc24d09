//! Error handling for ipagency-store
//!
//! Wraps ipagency-core ExError with store-specific helpers

use ipagency_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ChecksumMismatch)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// The declared source file does not exist
pub fn source_not_found(path: &Path) -> ExError {
    ExError::new(ExErrorKind::SourceNotFound)
        .with_op("ensure_source")
        .with_message(format!("Source file not found: {}", path.display()))
}

/// The source exists but could not be parsed
pub fn source_unreadable(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::SourceUnreadable)
        .with_op("read_source")
        .with_message(format!("Cannot read {}: {}", path.display(), reason))
}

/// The source file extension has no reader
pub fn unsupported_source(path: &Path) -> ExError {
    ExError::new(ExErrorKind::UnsupportedSource)
        .with_op("read_source")
        .with_message(format!(
            "Unsupported source format: {} (expected xlsx, xlsm, xls, ods or csv)",
            path.display()
        ))
}

/// No registered descriptor or no such table in the database
pub fn unknown_table(name: &str) -> ExError {
    ExError::new(ExErrorKind::UnknownTable)
        .with_table(name.to_string())
        .with_message(format!("Unknown table: {}", name))
}

/// A row names a column the destination table does not have
pub fn unknown_column(table: &str, column: &str) -> ExError {
    ExError::new(ExErrorKind::UnknownColumn)
        .with_op("insert_row")
        .with_table(table.to_string())
        .with_column(column.to_string())
        .with_message(format!("Table {} has no column named {}", table, column))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// A single row insert failed (constraint violation, type mismatch, ...)
pub fn row_insert(table: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::RowInsert)
        .with_op("insert_row")
        .with_table(table.to_string())
        .with_message(err.to_string())
}

