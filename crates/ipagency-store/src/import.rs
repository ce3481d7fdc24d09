//! Generic import engine
//!
//! One run: check the source, clear the destination table, read every row,
//! then transform and insert row by row. A failing row is recorded in the
//! outcome and the run moves on. Only failures outside the row loop abort.
//!
//! Audit columns (`created_at`/`updated_at`, `created_by`/`updated_by`) are
//! filled in only where the destination schema has them, and never over a
//! value the row already carries.
//!
//! The run is not wrapped in a transaction: once the table is cleared it
//! stays cleared, even if reading the source fails afterwards.

use crate::db::foreign_keys_enabled;
use crate::errors::{from_rusqlite, row_insert, unknown_column, Result};
use crate::provenance::{emit_best_effort, ProvenanceKind};
use crate::schema::TableSchema;
use crate::seed::workflows::workflow_source;
use crate::source::{FileSource, RowSource, SourceRow};
use crate::tables::{ImportSettings, TableDescriptor};
use ipagency_core::errors::ExError;
use ipagency_core::transform::{now_stamp, CREATED_AT, CREATED_BY, UPDATED_AT, UPDATED_BY};
use ipagency_core::{log_op_end, log_op_error, log_op_start};
use ipagency_core::{CellValue, ImportOutcome, Row, RowTransform};
use ipagency_core_types::schema::EVENT_ROW_FAILED;
use ipagency_core_types::RunContext;
use rusqlite::types::Value;
use rusqlite::Connection;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Parameters of one import run
pub struct ImportJob {
    pub table: String,
    pub source: Box<dyn RowSource>,
    pub transform: Box<dyn RowTransform>,
    /// Stamped into `created_by`/`updated_by` when the row has none
    pub actor_id: Option<i64>,
}

impl ImportJob {
    pub fn new(
        table: impl Into<String>,
        source: impl RowSource + 'static,
        transform: impl RowTransform + 'static,
    ) -> Self {
        Self {
            table: table.into(),
            source: Box::new(source),
            transform: Box::new(transform),
            actor_id: None,
        }
    }

    pub fn with_actor(mut self, actor_id: i64) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Build the job a descriptor describes.
    ///
    /// `file_override` replaces the descriptor's spreadsheet path; it is
    /// ignored for static tables.
    pub fn for_descriptor(
        descriptor: &TableDescriptor,
        source_dir: &Path,
        file_override: Option<PathBuf>,
        settings: &ImportSettings,
    ) -> Result<Self> {
        let transform = descriptor.transform(settings)?;
        let source: Box<dyn RowSource> = match descriptor.source_path(source_dir) {
            Some(path) => Box::new(FileSource::new(file_override.unwrap_or(path))),
            None => Box::new(workflow_source()?),
        };
        Ok(Self {
            table: descriptor.table.to_string(),
            source,
            transform: Box::new(transform),
            actor_id: Some(settings.default_actor_id),
        })
    }
}

/// Run one import. See the module docs for the step order.
pub fn run_import(conn: &Connection, job: &ImportJob) -> Result<ImportOutcome> {
    let start = Instant::now();
    let ctx = RunContext::new(job.table.as_str());
    let source = job.source.describe();

    log_op_start!(
        "run_import",
        table = ctx.table.as_str(),
        run_id = ctx.run_id.as_str(),
        source = source.as_str()
    );

    let result = import_rows(conn, job, &ctx);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(outcome) => {
            log_op_end!(
                "run_import",
                duration_ms = duration_ms,
                table = ctx.table.as_str(),
                run_id = ctx.run_id.as_str(),
                succeeded = outcome.success_count,
                failed = outcome.failure_count,
                skipped = outcome.skipped_count
            );
        }
        Err(err) => {
            log_op_error!(
                "run_import",
                err.clone(),
                duration_ms = duration_ms,
                table = ctx.table.as_str(),
                run_id = ctx.run_id.as_str()
            );
        }
    }

    result
}

fn import_rows(conn: &Connection, job: &ImportJob, ctx: &RunContext) -> Result<ImportOutcome> {
    let attach = |err: ExError| err.with_table(ctx.table.as_str()).with_run_id(ctx.run_id.clone());

    job.source.ensure_available().map_err(attach)?;
    let schema = TableSchema::load(conn, &ctx.table).map_err(attach)?;

    emit_best_effort(
        conn,
        ProvenanceKind::ImportStarted,
        &ctx.run_id,
        json!({ "table": ctx.table, "source": job.source.describe() }),
    );

    let rows = match truncate(conn, &schema).and_then(|_| job.source.read_rows()) {
        Ok(rows) => rows,
        Err(err) => {
            let err = attach(err);
            emit_best_effort(
                conn,
                ProvenanceKind::ImportFailed,
                &ctx.run_id,
                json!({ "table": ctx.table, "code": err.code(), "message": err.message() }),
            );
            return Err(err);
        }
    };

    let mut outcome = ImportOutcome::new(ctx.table.as_str(), ctx.run_id.clone());
    if rows.is_empty() {
        outcome.empty_source = true;
        tracing::warn!(
            table = ctx.table.as_str(),
            run_id = ctx.run_id.as_str(),
            "source has no data rows; table left empty"
        );
    }

    let secret_columns = job.transform.secret_columns();
    for SourceRow { line, row: raw } in rows {
        let filtered = raw.without_blanks();
        if filtered.is_empty() {
            outcome.record_skip();
            continue;
        }

        match import_row(conn, &schema, job, filtered) {
            Ok(()) => outcome.record_success(),
            Err(err) => {
                let err = attach(err).with_row(line);
                let raw = raw.redacted(&secret_columns);
                let raw_json = serde_json::to_string(&raw).unwrap_or_default();
                tracing::warn!(
                    event = EVENT_ROW_FAILED,
                    table = ctx.table.as_str(),
                    run_id = ctx.run_id.as_str(),
                    row = line,
                    err_code = err.code(),
                    message = err.message(),
                    raw = raw_json.as_str(),
                );
                outcome.record_failure(line, raw, &err);
            }
        }
    }

    emit_best_effort(
        conn,
        ProvenanceKind::ImportCompleted,
        &ctx.run_id,
        json!({
            "table": ctx.table,
            "succeeded": outcome.success_count,
            "failed": outcome.failure_count,
            "skipped": outcome.skipped_count,
        }),
    );

    Ok(outcome)
}

fn import_row(conn: &Connection, schema: &TableSchema, job: &ImportJob, row: Row) -> Result<()> {
    let mut row = job.transform.transform(row)?;

    // Explicit values, from the source or the transform, always win
    let now = now_stamp();
    for column in [CREATED_AT, UPDATED_AT] {
        if schema.has_column(column) {
            row.insert_if_absent(column, now.as_str());
        }
    }
    if let Some(actor_id) = job.actor_id {
        for column in [CREATED_BY, UPDATED_BY] {
            if schema.has_column(column) {
                row.insert_if_absent(column, actor_id);
            }
        }
    }

    insert_row(conn, schema, &row)
}

/// Insert one persistence-ready row
pub fn insert_row(conn: &Connection, schema: &TableSchema, row: &Row) -> Result<()> {
    if let Some(column) = row.columns().find(|c| !schema.has_column(c)) {
        return Err(unknown_column(schema.table(), column));
    }

    let columns: Vec<String> = row.columns().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(schema.table()),
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| row_insert(schema.table(), e))?;
    stmt.execute(rusqlite::params_from_iter(row.iter().map(|(_, v)| sql_value(v))))
        .map_err(|e| row_insert(schema.table(), e))?;
    Ok(())
}

/// Empty the table and reset its AUTOINCREMENT counter.
///
/// Foreign-key enforcement is suspended for the delete so parent tables
/// can be reloaded while children still point at them.
pub fn truncate(conn: &Connection, schema: &TableSchema) -> Result<()> {
    let enforcing = foreign_keys_enabled(conn)?;
    if enforcing {
        conn.execute_batch("PRAGMA foreign_keys = OFF;")
            .map_err(from_rusqlite)?;
    }

    let result = delete_all(conn, schema);

    if enforcing {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(from_rusqlite)?;
    }

    tracing::debug!(table = schema.table(), "table truncated");
    result
}

fn delete_all(conn: &Connection, schema: &TableSchema) -> Result<()> {
    conn.execute(&format!("DELETE FROM {}", quote_ident(schema.table())), [])
        .map_err(|e| from_rusqlite(e).with_op("truncate").with_table(schema.table()))?;

    let has_sequence: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n > 0)
        .map_err(from_rusqlite)?;

    if has_sequence && schema.has_rowid_key() {
        conn.execute(
            "DELETE FROM sqlite_sequence WHERE name = ?1",
            [schema.table()],
        )
        .map_err(|e| from_rusqlite(e).with_op("truncate").with_table(schema.table()))?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_value(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Integer(i64::from(*b)),
        CellValue::Integer(n) => Value::Integer(*n),
        CellValue::Real(f) => Value::Real(*f),
        CellValue::Text(s) => Value::Text(s.clone()),
        CellValue::Json(v) => Value::Text(v.to_string()),
    }
}
