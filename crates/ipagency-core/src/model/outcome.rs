use crate::errors::ExError;
use crate::model::Row;
use ipagency_core_types::RunId;
use serde::Serialize;

/// One row that could not be imported
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// Spreadsheet line number (header is line 1, first data row is line 2)
    pub row_number: usize,
    /// The row as read from the source, secret columns masked
    pub raw: Row,
    /// Stable error code of the failure
    pub code: String,
    pub message: String,
}

/// Aggregate result of one import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub table: String,
    pub run_id: RunId,
    pub success_count: usize,
    pub failure_count: usize,
    /// Rows dropped because every cell was blank
    pub skipped_count: usize,
    /// The source had a header but no data rows
    pub empty_source: bool,
    pub failures: Vec<RowFailure>,
}

impl ImportOutcome {
    pub fn new(table: impl Into<String>, run_id: RunId) -> Self {
        Self {
            table: table.into(),
            run_id,
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            empty_source: false,
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    /// Record a failed row. An empty error message is replaced by the error code
    /// so every failure carries a readable reason.
    pub fn record_failure(&mut self, row_number: usize, raw: Row, err: &ExError) {
        let message = if err.message().is_empty() {
            err.code().to_string()
        } else {
            err.message().to_string()
        };
        self.failure_count += 1;
        self.failures.push(RowFailure {
            row_number,
            raw,
            code: err.code().to_string(),
            message,
        });
    }

    /// Rows read from the source, whatever happened to them
    pub fn rows_seen(&self) -> usize {
        self.success_count + self.failure_count + self.skipped_count
    }

    /// No row failed
    pub fn is_clean(&self) -> bool {
        self.failure_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_counts_accumulate() {
        let mut outcome = ImportOutcome::new("fee_types", RunId::new());
        outcome.record_success();
        outcome.record_success();
        outcome.record_skip();
        outcome.record_failure(
            5,
            Row::new(),
            &ExError::new(ExErrorKind::RowInsert).with_message("UNIQUE constraint failed"),
        );

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(outcome.rows_seen(), 4);
        assert!(!outcome.is_clean());
        assert_eq!(outcome.failures[0].row_number, 5);
        assert_eq!(outcome.failures[0].code, "ERR_ROW_INSERT");
    }

    #[test]
    fn test_failure_message_never_empty() {
        let mut outcome = ImportOutcome::new("roles", RunId::new());
        outcome.record_failure(2, Row::new(), &ExError::new(ExErrorKind::RowInsert));
        assert_eq!(outcome.failures[0].message, "ERR_ROW_INSERT");
    }
}
