mod common;

use common::migrated_db;
use ipagency_core::logging_facility::test_capture::init_test_capture;
use ipagency_core::{Row, TransformError};
use ipagency_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_ROW_FAILED, EVENT_START};
use ipagency_store::{run_import, ImportJob, StaticSource};

fn reject_codes_starting_with_x(row: Row) -> Result<Row, TransformError> {
    match row.get("code").and_then(|c| c.as_text()) {
        Some(code) if code.starts_with('X') => Err(TransformError::InvalidValue {
            column: "code".to_string(),
            reason: "reserved prefix".to_string(),
        }),
        _ => Ok(row),
    }
}

#[test]
fn test_run_is_bracketed_by_start_and_end() {
    let capture = init_test_capture();
    let conn = migrated_db();
    let rows: Vec<Row> = vec![
        vec![("name", "Admin"), ("code", "ADMIN")].into_iter().collect(),
        vec![("name", "Reserved"), ("code", "XRESERVED")].into_iter().collect(),
    ];
    let job = ImportJob::new(
        "roles",
        StaticSource::new("roles", rows),
        reject_codes_starting_with_x,
    );

    let outcome = run_import(&conn, &job).unwrap();
    assert_eq!(outcome.failure_count, 1);
    assert_eq!(outcome.failures[0].code, "ERR_ROW_TRANSFORM");

    let run_id = outcome.run_id.as_str().to_string();
    let for_run: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.fields.get("run_id") == Some(&run_id))
        .collect();

    let has = |event: &str| for_run.iter().any(|e| e.event.as_deref() == Some(event));
    assert!(has(EVENT_START));
    assert!(has(EVENT_END));
    assert!(has(EVENT_ROW_FAILED));

    let end = for_run
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.fields.get("succeeded"), Some(&"1".to_string()));
    assert_eq!(end.fields.get("failed"), Some(&"1".to_string()));
}

#[test]
fn test_fatal_error_logged_as_end_error() {
    let capture = init_test_capture();
    let conn = migrated_db();
    let job = ImportJob::new(
        "no_such_table_for_logging",
        StaticSource::default(),
        reject_codes_starting_with_x,
    );

    assert!(run_import(&conn, &job).is_err());

    let errors = capture.count_events(|e| {
        e.table.as_deref() == Some("no_such_table_for_logging")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
    });
    assert_eq!(errors, 1);
}
