use ipagency_config::TimestampMode;
use ipagency_core::ImportOutcome;
use ipagency_store::tables::{self, ImportSettings};
use ipagency_store::{db, migrations, run_import, ImportJob};
use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// In-memory database with foreign keys on and all migrations applied
#[allow(dead_code)]
pub fn migrated_db() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    db::configure(&conn).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();
    conn
}

/// Settings that stamp the default fixed literal on every table
#[allow(dead_code)]
pub fn fixed_settings() -> ImportSettings {
    ImportSettings {
        timestamps: Some(TimestampMode::Fixed),
        ..ImportSettings::default()
    }
}

/// Write a one-sheet workbook. Cells that parse as numbers are written as
/// numbers, empty strings are left blank.
#[allow(dead_code)]
pub fn write_xlsx(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let line = (r + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) => sheet.write_number(line, col as u16, n).unwrap(),
                Err(_) => sheet.write_string(line, col as u16, *value).unwrap(),
            };
        }
    }
    workbook.save(path).unwrap();
}

/// Import `table` from its spreadsheet under `source_dir`
#[allow(dead_code)]
pub fn import_table(
    conn: &Connection,
    source_dir: &Path,
    table: &str,
    settings: &ImportSettings,
) -> ipagency_store::Result<ImportOutcome> {
    let descriptor = tables::find(table)?;
    let job = ImportJob::for_descriptor(descriptor, source_dir, None, settings)?;
    run_import(conn, &job)
}

#[allow(dead_code)]
pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}
