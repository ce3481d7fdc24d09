use ipagency_core_types::RunId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and the failure lines printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    UnknownTable,
    UnknownColumn,

    // Source file
    /// The declared spreadsheet does not exist (table untouched)
    SourceNotFound,
    /// The spreadsheet exists but could not be opened or parsed
    SourceUnreadable,
    /// File extension is not a supported spreadsheet format
    UnsupportedSource,

    // Per-row (always recovered into the import outcome)
    RowTransform,
    RowInsert,

    // Migrations
    ChecksumMismatch,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownTable => "ERR_UNKNOWN_TABLE",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::SourceNotFound => "ERR_SOURCE_NOT_FOUND",
            ExErrorKind::SourceUnreadable => "ERR_SOURCE_UNREADABLE",
            ExErrorKind::UnsupportedSource => "ERR_UNSUPPORTED_SOURCE",
            ExErrorKind::RowTransform => "ERR_ROW_TRANSFORM",
            ExErrorKind::RowInsert => "ERR_ROW_INSERT",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind is scoped to a single row.
    ///
    /// Row-scoped errors are recorded in the outcome; everything else ends the run.
    pub fn is_row_scoped(&self) -> bool {
        matches!(
            self,
            ExErrorKind::RowTransform | ExErrorKind::RowInsert | ExErrorKind::UnknownColumn
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and the
/// import context (table, row, column) for the operator.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    row: Option<usize>,
    column: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            row: None,
            column: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add destination table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add spreadsheet line context (1-based, header is line 1)
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(row) = self.row {
            write!(f, " (row: {})", row)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Errors raised by a row transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A timestamp literal does not match `YYYY-MM-DD HH:MM:SS`
    #[error("Invalid timestamp '{value}' for column {column}")]
    InvalidTimestamp { column: String, value: String },

    /// A secret column could not be hashed
    #[error("Failed to hash secret column {column}: {message}")]
    Hash { column: String, message: String },

    /// A cell holds a value the destination column cannot take
    #[error("Invalid value for column {column}: {reason}")]
    InvalidValue { column: String, reason: String },
}

impl TransformError {
    /// Column the error refers to
    pub fn column(&self) -> &str {
        match self {
            TransformError::InvalidTimestamp { column, .. }
            | TransformError::Hash { column, .. }
            | TransformError::InvalidValue { column, .. } => column,
        }
    }
}

impl From<TransformError> for ExError {
    fn from(err: TransformError) -> Self {
        ExError::new(ExErrorKind::RowTransform)
            .with_op("transform_row")
            .with_column(err.column().to_string())
            .with_message(err.to_string())
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::UnknownTable,
            ExErrorKind::UnknownColumn,
            ExErrorKind::SourceNotFound,
            ExErrorKind::SourceUnreadable,
            ExErrorKind::UnsupportedSource,
            ExErrorKind::RowTransform,
            ExErrorKind::RowInsert,
            ExErrorKind::ChecksumMismatch,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
            ExErrorKind::Persistence,
            ExErrorKind::Config,
            ExErrorKind::Internal,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::RowInsert)
            .with_op("insert_row")
            .with_table("case_types")
            .with_row(4)
            .with_message("FOREIGN KEY constraint failed");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_ROW_INSERT]"));
        assert!(text.contains("insert_row"));
        assert!(text.contains("case_types"));
        assert!(text.contains("row: 4"));
        assert!(text.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_transform_error_converts_to_row_transform_kind() {
        let err: ExError = TransformError::InvalidTimestamp {
            column: "created_at".to_string(),
            value: "yesterday".to_string(),
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::RowTransform);
        assert_eq!(err.column(), Some("created_at"));
        assert!(err.message().contains("yesterday"));
    }

    #[test]
    fn test_row_scoped_kinds() {
        assert!(ExErrorKind::RowInsert.is_row_scoped());
        assert!(ExErrorKind::RowTransform.is_row_scoped());
        assert!(!ExErrorKind::SourceNotFound.is_row_scoped());
        assert!(!ExErrorKind::Persistence.is_row_scoped());
    }
}
