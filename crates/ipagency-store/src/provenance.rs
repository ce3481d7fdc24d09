//! Provenance events for import runs
//!
//! Each run writes `import_started` and then `import_completed` (or
//! `import_failed`) into `provenance_events`, keyed by the run id.

use crate::errors::{from_rusqlite, Result};
use ipagency_core_types::RunId;
use rusqlite::Connection;

/// Provenance event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvenanceKind {
    ImportStarted,
    ImportCompleted,
    ImportFailed,
}

impl ProvenanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceKind::ImportStarted => "import_started",
            ProvenanceKind::ImportCompleted => "import_completed",
            ProvenanceKind::ImportFailed => "import_failed",
        }
    }
}

/// A recorded provenance event
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceEvent {
    pub kind: String,
    pub correlation_id: String,
    pub timestamp: i64,
    pub metadata: serde_json::Value,
}

/// Emit a provenance event
pub fn emit_event(
    conn: &Connection,
    kind: ProvenanceKind,
    run_id: &RunId,
    metadata: serde_json::Value,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO provenance_events (kind, correlation_id, timestamp, metadata) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![kind.as_str(), run_id.as_str(), now, metadata.to_string()],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Emit an event, logging instead of failing
///
/// Provenance is bookkeeping; a run never fails because of it.
pub fn emit_best_effort(
    conn: &Connection,
    kind: ProvenanceKind,
    run_id: &RunId,
    metadata: serde_json::Value,
) {
    if let Err(err) = emit_event(conn, kind, run_id, metadata) {
        tracing::warn!(
            run_id = run_id.as_str(),
            kind = kind.as_str(),
            err_code = err.code(),
            message = err.message(),
            "provenance event not recorded"
        );
    }
}

/// Events recorded for one run, oldest first
pub fn events_for_run(conn: &Connection, run_id: &RunId) -> Result<Vec<ProvenanceEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT kind, correlation_id, timestamp, metadata FROM provenance_events
             WHERE correlation_id = ?1 ORDER BY id",
        )
        .map_err(from_rusqlite)?;
    let events = stmt
        .query_map([run_id.as_str()], |row| {
            let metadata: Option<String> = row.get(3)?;
            Ok(ProvenanceEvent {
                kind: row.get(0)?,
                correlation_id: row.get(1)?,
                timestamp: row.get(2)?,
                metadata: metadata
                    .and_then(|m| serde_json::from_str(&m).ok())
                    .unwrap_or(serde_json::Value::Null),
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(events)
}
